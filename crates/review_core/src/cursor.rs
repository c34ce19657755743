/// Unix timestamp lower bound for the next fetch window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn starting_at(timestamp: i64) -> Self {
        Self(timestamp)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Move forward to the server-reported date. Returns whether the cursor changed.
    ///
    /// A missing or older date leaves the cursor where it is.
    pub fn advance(&mut self, reported: Option<i64>) -> bool {
        match reported {
            Some(next) if next > self.0 => {
                self.0 = next;
                true
            }
            _ => false,
        }
    }
}
