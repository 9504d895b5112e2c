mod contact_id;
mod new_subscriber;
mod subscriber_email;

pub use contact_id::ContactId;
pub use new_subscriber::NewSubscriber;
pub use subscriber_email::SubscriberEmail;
