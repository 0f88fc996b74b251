use super::credential::{Credential, Destination};

/// One outbound send, built right before the request and dropped after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<'a> {
    pub credential: &'a Credential,
    pub destination: &'a Destination,
    /// Display name and message joined by a single space
    pub text: String,
}

impl<'a> Notification<'a> {
    pub fn compose(
        display_name: &str,
        message: &str,
        credential: &'a Credential,
        destination: &'a Destination,
    ) -> Self {
        Self {
            credential,
            destination,
            text: format!("{display_name} {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prefixes_display_name() {
        let credential = Credential::new("tok1").unwrap();
        let destination = Destination::new("d1").unwrap();

        let notification = Notification::compose("X", "hello", &credential, &destination);

        assert_eq!(notification.text, "X hello");
        assert_eq!(notification.credential.expose(), "tok1");
        assert_eq!(notification.destination.as_str(), "d1");
    }

    #[test]
    fn test_compose_keeps_message_verbatim() {
        let credential = Credential::new("tok1").unwrap();
        let destination = Destination::new("d1").unwrap();

        let notification =
            Notification::compose("Team", "  spaced  out ", &credential, &destination);

        assert_eq!(notification.text, "Team   spaced  out ");
    }
}
