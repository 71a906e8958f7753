//! Outcome classification and accumulation.

use harvest_shared::{BulkItemResponse, ItemOutcome, OpType, PushSummary, Record};

/// Status code the store reports for a document that does not exist.
const NOT_FOUND: u16 = 404;

/// Callback invoked once per processed record with its effective outcome.
///
/// It runs inline with the push: a slow observer slows the whole pipeline.
pub type Observer<'a> = dyn FnMut(bool, &ItemOutcome) + Send + 'a;

/// Decide whether a raw outcome counts as a success.
///
/// A delete or update that failed only because the document does not exist
/// counts as a success. Everything else passes through unchanged.
pub fn classify(ok: bool, item: &BulkItemResponse) -> bool {
    if ok {
        return true;
    }
    matches!(item.op, OpType::Delete | OpType::Update) && item.status() == Some(NOT_FOUND)
}

/// Tallies outcomes of a push and forwards each one to the observer.
pub struct OutcomeAccumulator<'a> {
    succeeded: usize,
    failures: Vec<BulkItemResponse>,
    observer: Option<&'a mut Observer<'a>>,
}

impl<'a> OutcomeAccumulator<'a> {
    /// Create an empty accumulator.
    pub fn new(observer: Option<&'a mut Observer<'a>>) -> Self {
        Self {
            succeeded: 0,
            failures: Vec::new(),
            observer,
        }
    }

    /// Classify and record one store acknowledgement.
    ///
    /// Returns the effective outcome.
    pub fn record(&mut self, ok: bool, item: BulkItemResponse) -> bool {
        let ok = classify(ok, &item);
        let outcome = ItemOutcome::Acknowledged(item);
        self.notify(ok, &outcome);

        if ok {
            self.succeeded += 1;
        } else if let ItemOutcome::Acknowledged(item) = outcome {
            self.failures.push(item);
        }
        ok
    }

    /// Record a record a dry run would have written. Always a success.
    pub fn preview(&mut self, record: Record) {
        self.succeeded += 1;
        self.notify(true, &ItemOutcome::Previewed(record));
    }

    fn notify(&mut self, ok: bool, outcome: &ItemOutcome) {
        if let Some(observer) = self.observer.as_mut() {
            observer(ok, outcome);
        }
    }

    /// Number of successes so far.
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Consume the accumulator into the push summary.
    pub fn finish(self) -> PushSummary {
        PushSummary {
            succeeded: self.succeeded,
            failures: self.failures,
        }
    }
}
