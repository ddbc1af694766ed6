/// Source of wall-clock time, in milliseconds since the Unix epoch.
///
/// The admission controller works on epoch milliseconds because the reset
/// instant is reported to clients as a timestamp.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}
