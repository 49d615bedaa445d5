//! Ticket numbers printed on kitchen and customer receipts.
//!
//! Numbers come from the backend when it answers; otherwise the terminal falls back to
//! a local counter that restarts at 0 on the first ticket of each day.

use crate::model::OrderId;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("Ticket service unavailable: {0}")]
    Unavailable(String),
}

/// Remote issuer of ticket numbers.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// `Ok(None)` means the service answered without a number.
    async fn ticket_number(&self, order: OrderId) -> Result<Option<u32>, TicketError>;
}

/// Where an assigned number came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketNumber {
    Remote(u32),
    Local(u32),
}

impl TicketNumber {
    pub fn value(self) -> u32 {
        match self {
            TicketNumber::Remote(n) | TicketNumber::Local(n) => n,
        }
    }
}

/// Daily local ticket counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketCounter {
    last_reset: Option<NaiveDate>,
    current: u32,
}

impl TicketCounter {
    /// Next local number. The first call on a new day returns 0.
    pub fn next(&mut self, today: NaiveDate) -> u32 {
        if self.last_reset != Some(today) {
            self.last_reset = Some(today);
            self.current = 0;
        } else {
            self.current = self.current.saturating_add(1);
        }
        self.current
    }

    /// Adopts a number issued by the backend so local numbering continues from it.
    pub fn sync(&mut self, remote: u32) {
        self.current = remote;
    }

    pub fn current(&self) -> u32 {
        self.current
    }
}

pub struct TicketAssigner<S> {
    source: S,
    counter: Mutex<TicketCounter>,
}

impl<S: TicketSource> TicketAssigner<S> {
    pub fn new(source: S) -> Self {
        Self::with_counter(source, TicketCounter::default())
    }

    pub fn with_counter(source: S, counter: TicketCounter) -> Self {
        Self {
            source,
            counter: Mutex::new(counter),
        }
    }

    pub async fn assign(&self, order: OrderId, today: NaiveDate) -> TicketNumber {
        let remote = self.source.ticket_number(order).await;
        let mut counter = self.counter.lock().unwrap_or_else(PoisonError::into_inner);
        match remote {
            Ok(Some(number)) => {
                debug!(%order, number, "Remote ticket number");
                counter.sync(number);
                TicketNumber::Remote(number)
            }
            Ok(None) => {
                let number = counter.next(today);
                warn!(%order, number, "No remote ticket number, using local counter");
                TicketNumber::Local(number)
            }
            Err(e) => {
                let number = counter.next(today);
                warn!(%order, number, error = %e, "Ticket service failed, using local counter");
                TicketNumber::Local(number)
            }
        }
    }

    pub fn counter(&self) -> TicketCounter {
        self.counter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    struct Scripted(Mutex<Vec<Result<Option<u32>, TicketError>>>);

    #[async_trait]
    impl TicketSource for Scripted {
        async fn ticket_number(&self, _order: OrderId) -> Result<Option<u32>, TicketError> {
            self.0.lock().unwrap().remove(0)
        }
    }

    #[test]
    fn test_counter_resets_daily() {
        let mut counter = TicketCounter::default();
        assert_eq!(counter.next(day(1)), 0);
        assert_eq!(counter.next(day(1)), 1);
        assert_eq!(counter.next(day(1)), 2);
        assert_eq!(counter.next(day(2)), 0);
    }

    #[tokio::test]
    async fn test_remote_number_wins_and_syncs() {
        let source = Scripted(Mutex::new(vec![
            Ok(Some(41)),
            Err(TicketError::Unavailable("offline".into())),
            Ok(None),
        ]));
        let mut counter = TicketCounter::default();
        counter.next(day(5));
        let assigner = TicketAssigner::with_counter(source, counter);

        assert_eq!(
            assigner.assign(OrderId(1), day(5)).await,
            TicketNumber::Remote(41)
        );
        assert_eq!(
            assigner.assign(OrderId(2), day(5)).await,
            TicketNumber::Local(42)
        );
        assert_eq!(assigner.assign(OrderId(3), day(6)).await.value(), 0);
    }

    #[tokio::test]
    async fn test_fresh_assigner_counts_locally() {
        let source = Scripted(Mutex::new(vec![Ok(None), Ok(None), Ok(Some(17))]));
        let assigner = TicketAssigner::new(source);
        assert_eq!(assigner.counter().current(), 0);

        assigner.assign(OrderId(1), day(9)).await;
        assert_eq!(
            assigner.assign(OrderId(2), day(9)).await,
            TicketNumber::Local(1)
        );
        assert_eq!(assigner.counter().current(), 1);

        assigner.assign(OrderId(3), day(9)).await;
        assert_eq!(assigner.counter().current(), 17);
    }
}
