use crate::domain::SubscriberEmail;

/// A subscription request that passed validation and may be forwarded to the provider.
#[derive(Debug)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
}
