use validator::ValidateEmail;

#[derive(Debug, Clone)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if email.validate_email() && has_plain_shape(&email) {
            Ok(Self(email))
        } else {
            Err("Please enter a valid email address".to_string())
        }
    }
}

/// Narrower than RFC 5322: a dotted local part without leading, trailing or
/// doubled dots, and a hostname ending in an alphabetic TLD of two or more letters.
/// IP literals and single-label hosts are refused.
fn has_plain_shape(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c))
        && !local.starts_with('.')
        && !local.contains("..")
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || "_+-".contains(c));

    let mut labels: Vec<&str> = domain.split('.').collect();
    let Some(tld) = labels.pop() else {
        return false;
    };
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    let labels_ok = !labels.is_empty()
        && labels.iter().all(|label| {
            label.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

    local_ok && tld_ok && labels_ok
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
