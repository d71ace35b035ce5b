/// A user posted a qualifying link in a guild at `posted_at` (unix seconds).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub guild_id: u64,
    pub user_id: u64,
    pub posted_at: u64,
}
