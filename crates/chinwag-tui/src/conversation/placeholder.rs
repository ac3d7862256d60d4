//! Busy-aware placeholder text for the input area.

/// Get placeholder text for the input area.
///
/// While a request is in flight the input is locked, and the placeholder
/// says so instead of inviting another message.
#[must_use]
pub fn input_placeholder(busy: bool) -> &'static str {
    if busy {
        "Waiting for the reply..."
    } else {
        "Message chinwag..."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_placeholder_invites_a_message() {
        assert_eq!(input_placeholder(false), "Message chinwag...");
    }

    #[test]
    fn test_busy_placeholder_differs() {
        assert_ne!(input_placeholder(true), input_placeholder(false));
    }

    #[test]
    fn test_placeholders_are_nonempty() {
        for busy in [false, true] {
            assert!(!input_placeholder(busy).is_empty());
        }
    }
}
