use super::notification_models::Notification;

/// Ordered feed for one viewer, most recent first, plus the badge counter.
///
/// The counter is only authoritative with respect to what callers tell it:
/// `remove` and `mark_read` leave it alone, and `update_unread_count`
/// overwrites it. `count_unread` recounts from the list when a caller wants
/// to reconcile.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
    unread_count: usize,
    all_read: bool,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self {
            notifications: Vec::new(),
            unread_count: 0,
            all_read: true,
        }
    }

    /// Replace the whole feed. `records` must already be most-recent-first.
    pub fn load(&mut self, records: Vec<Notification>) {
        self.notifications = records;
        let unread = self.count_unread();
        self.update_unread_count(unread);
    }

    /// Insert at the front if the record targets `viewer_id`. Returns whether
    /// the record was inserted.
    pub fn prepend(&mut self, record: Notification, viewer_id: &str) -> bool {
        if record.receiver_id != viewer_id {
            return false;
        }

        if !record.read {
            let unread = self.unread_count + 1;
            self.update_unread_count(unread);
        }
        self.notifications.insert(0, record);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Notification> {
        let index = self.notifications.iter().position(|n| n.id == id)?;
        Some(self.notifications.remove(index))
    }

    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn update_unread_count(&mut self, count: usize) {
        self.unread_count = count;
        self.all_read = count == 0;
    }

    pub fn count_unread(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
        self.update_unread_count(0);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    pub fn all_read(&self) -> bool {
        self.all_read
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
