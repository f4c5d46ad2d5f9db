//! In-app notifications.
//!
//! Other modules write notifications from inside their own transactions
//! through [`insert_notification`], so a notification only exists when the
//! change it describes was committed.

mod crud;
mod storage;
mod types;

pub use crud::{list_notifications, mark_all_read, mark_read, notify, ListNotificationsOptions};
pub use storage::insert_notification;
pub use types::{Notification, NotificationError, NotificationKind};
