use chrono::{DateTime, Utc};

/// A fact decided by an aggregate about one ledger record.
///
/// Events are not stored on their own: they are applied to the record in
/// memory and the resulting record is written back as a whole. The store's
/// revision history is the durable trail.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "listing.transferred_to_importer").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// Id of the record the event changes.
    fn subject(&self) -> &str;

    /// When the decision was taken (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
