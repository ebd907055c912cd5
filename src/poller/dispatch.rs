//! Status body classification.

use crate::config::DispatchMode;
use crate::poller::PollResult;

pub const READY_BODY: &str = "ok";
pub const PENDING_BODY: &str = "fail";

/// Classify a raw status body. Matching is exact.
pub fn classify(mode: DispatchMode, raw: &str) -> PollResult {
    match (mode, raw) {
        (_, READY_BODY) => PollResult::Ready,
        (DispatchMode::Lenient, _) | (DispatchMode::Strict, PENDING_BODY) => PollResult::Pending,
        (DispatchMode::Strict, other) => PollResult::Unrecognized(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_retries_everything_but_ok() {
        for raw in ["fail", "", "OK", " ok", "ok\n", "error: bad handle", "<html>"] {
            assert_eq!(classify(DispatchMode::Lenient, raw), PollResult::Pending, "{:?}", raw);
        }
        assert_eq!(classify(DispatchMode::Lenient, "ok"), PollResult::Ready);
    }

    #[test]
    fn test_strict_separates_unrecognized() {
        assert_eq!(classify(DispatchMode::Strict, "ok"), PollResult::Ready);
        assert_eq!(classify(DispatchMode::Strict, "fail"), PollResult::Pending);
        assert_eq!(
            classify(DispatchMode::Strict, "error: bad handle"),
            PollResult::Unrecognized("error: bad handle".into())
        );
    }
}
