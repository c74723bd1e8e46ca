pub mod connection;
pub mod donation;
pub mod event;
pub mod feedback;
pub mod job;
pub mod message;
pub mod post;
pub mod story;
pub mod user;

pub use connection::{Connection, ConnectionStatus};
pub use donation::{Donation, DonationWithDonor, DonorSummary, LeaderboardEntry};
pub use event::Event;
pub use feedback::Feedback;
pub use job::{Job, JobFilter};
pub use message::Message;
pub use post::{Comment, Like, Post};
pub use story::{StoryWithAuthor, SuccessStory};
pub use user::{PeopleFilter, User, UserSummary};
