//! Repository seams between controllers and the relational store.
//!
//! One trait per entity type; the [`Repositories`] bundle is constructed once
//! at startup and injected into handlers through application state, so there
//! is no hidden process-wide persistence singleton and tests can substitute
//! in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::manager::DatabaseError;
use super::models::{
    Comment, Connection, Donation, DonationWithDonor, Event, Feedback, Job, JobFilter,
    LeaderboardEntry, Like, Message, PeopleFilter, Post, StoryWithAuthor, SuccessStory, User,
    UserSummary,
};
use super::postgres;

type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password_hash: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub company_location: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_start_year: Option<i32>,
    pub graduation_end_year: Option<i32>,
    pub location: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update(&self, id: i64, update: UserUpdate) -> Result<User>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn search(&self, query: &str) -> Result<Vec<UserSummary>>;
    async fn filter(&self, filter: &PeopleFilter) -> Result<Vec<UserSummary>>;
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub content: String,
    pub media_urls: Vec<String>,
    pub author_id: i64,
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: i64,
    pub author_id: i64,
}

#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment>;
    /// Find a comment only if it belongs to the given post.
    async fn find_in_post(&self, comment_id: i64, post_id: i64) -> Result<Option<Comment>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait LikeRepo: Send + Sync {
    async fn find(&self, post_id: i64, user_id: i64) -> Result<Option<Like>>;
    async fn create(&self, post_id: i64, user_id: i64) -> Result<Like>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
pub trait ConnectionRepo: Send + Sync {
    /// Lookup by exact ordered pair, any status.
    async fn find_pair(&self, follower_id: i64, following_id: i64) -> Result<Option<Connection>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Connection>>;
    /// Create a PENDING edge.
    async fn create(&self, follower_id: i64, following_id: i64) -> Result<Connection>;
    async fn set_status(&self, id: i64, status: &str) -> Result<Connection>;
    /// Users following `user_id` over ACCEPTED edges.
    async fn accepted_followers(&self, user_id: i64) -> Result<Vec<UserSummary>>;
    /// Users `user_id` follows over ACCEPTED edges.
    async fn accepted_followings(&self, user_id: i64) -> Result<Vec<UserSummary>>;
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub experience: String,
    pub location: String,
    pub job_type: String,
    pub industry: String,
    pub job_function: String,
    pub remote: String,
}

#[async_trait]
pub trait JobRepo: Send + Sync {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>>;
    async fn create(&self, job: NewJob) -> Result<Job>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Job>>;
    async fn update(&self, id: i64, job: NewJob) -> Result<Option<Job>>;
    /// Returns false when no row matched.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub content: String,
    pub images: Option<Vec<String>>,
    pub link: Option<String>,
    pub date: DateTime<Utc>,
    pub user_id: i64,
}

#[async_trait]
pub trait EventRepo: Send + Sync {
    async fn create(&self, event: NewEvent) -> Result<Event>;
    /// Events strictly after `now`, soonest first.
    async fn upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;
    /// Events strictly before `now`, most recent first.
    async fn past(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub content: String,
    pub attached_file: Option<String>,
    pub user_id: i64,
}

#[async_trait]
pub trait FeedbackRepo: Send + Sync {
    async fn create(&self, feedback: NewFeedback) -> Result<Feedback>;
    async fn list(&self) -> Result<Vec<Feedback>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub amount: f64,
    pub currency: String,
    pub donor_id: i64,
}

#[async_trait]
pub trait DonationRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<DonationWithDonor>>;
    async fn create(&self, donation: NewDonation) -> Result<Donation>;
    /// Donors ranked by summed amount, largest first.
    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>>;
}

#[derive(Debug, Clone)]
pub struct NewStory {
    pub title: String,
    pub description: String,
    pub author_id: i64,
}

#[async_trait]
pub trait StoryRepo: Send + Sync {
    async fn list_published(&self) -> Result<Vec<StoryWithAuthor>>;
    async fn create(&self, story: NewStory) -> Result<SuccessStory>;
    async fn find_by_id(&self, id: i64) -> Result<Option<SuccessStory>>;
    async fn set_published(&self, id: i64, published: bool) -> Result<SuccessStory>;
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub content: Option<String>,
    pub attachment: Option<String>,
    pub sender_id: i64,
    pub receiver_id: i64,
}

#[async_trait]
pub trait MessageRepo: Send + Sync {
    async fn create(&self, message: NewMessage) -> Result<Message>;
    /// Both directions between the two users, oldest first.
    async fn conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>>;
}

/// The full set of persistence collaborators, built once at startup.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepo>,
    pub posts: Arc<dyn PostRepo>,
    pub comments: Arc<dyn CommentRepo>,
    pub likes: Arc<dyn LikeRepo>,
    pub connections: Arc<dyn ConnectionRepo>,
    pub jobs: Arc<dyn JobRepo>,
    pub events: Arc<dyn EventRepo>,
    pub feedbacks: Arc<dyn FeedbackRepo>,
    pub donations: Arc<dyn DonationRepo>,
    pub stories: Arc<dyn StoryRepo>,
    pub messages: Arc<dyn MessageRepo>,
}

impl Repositories {
    /// Wire every repository to the shared Postgres pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepo::new(pool.clone())),
            posts: Arc::new(postgres::PgPostRepo::new(pool.clone())),
            comments: Arc::new(postgres::PgCommentRepo::new(pool.clone())),
            likes: Arc::new(postgres::PgLikeRepo::new(pool.clone())),
            connections: Arc::new(postgres::PgConnectionRepo::new(pool.clone())),
            jobs: Arc::new(postgres::PgJobRepo::new(pool.clone())),
            events: Arc::new(postgres::PgEventRepo::new(pool.clone())),
            feedbacks: Arc::new(postgres::PgFeedbackRepo::new(pool.clone())),
            donations: Arc::new(postgres::PgDonationRepo::new(pool.clone())),
            stories: Arc::new(postgres::PgStoryRepo::new(pool.clone())),
            messages: Arc::new(postgres::PgMessageRepo::new(pool)),
        }
    }
}
