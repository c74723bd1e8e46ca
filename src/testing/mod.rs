//! Test support: in-memory repository fakes, a counting event publisher, and
//! request helpers for driving the real router in-process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::auth;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Comment, Connection, ConnectionStatus, Donation, DonationWithDonor, DonorSummary, Event,
    Feedback, Job, JobFilter, LeaderboardEntry, Like, Message, PeopleFilter, Post,
    StoryWithAuthor, SuccessStory, User, UserSummary,
};
use crate::database::repository::{
    CommentRepo, ConnectionRepo, DonationRepo, EventRepo, FeedbackRepo, JobRepo, LikeRepo,
    MessageRepo, NewComment, NewDonation, NewEvent, NewFeedback, NewJob, NewMessage, NewPost,
    NewStory, NewUser, PostRepo, Repositories, StoryRepo, UserRepo, UserUpdate,
};
use crate::realtime::EventPublisher;
use crate::state::AppState;

type Result<T> = std::result::Result<T, DatabaseError>;
type SharedUsers = Arc<RwLock<Vec<User>>>;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Publisher fake that only counts outbound events.
#[derive(Default)]
pub struct CountingPublisher {
    published: AtomicUsize,
}

#[async_trait]
impl EventPublisher for CountingPublisher {
    async fn publish_new_message(&self, _message: &Message) {
        self.published.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MemUserRepo {
    users: SharedUsers,
    next_id: AtomicI64,
}

#[async_trait]
impl UserRepo for MemUserRepo {
    async fn create(&self, user: NewUser) -> Result<User> {
        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: user.username,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            password_hash: user.password_hash,
            role: "MEMBER".into(),
            avatar_url: None,
            bio: None,
            company: None,
            company_location: None,
            field_of_study: None,
            graduation_start_year: None,
            graduation_end_year: None,
            location: None,
            industry: None,
            created_at: Utc::now(),
        };
        self.users.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DatabaseError::NotFound("user".into()))?;

        if let Some(v) = update.firstname {
            user.firstname = v;
        }
        if let Some(v) = update.lastname {
            user.lastname = v;
        }
        if let Some(v) = update.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = update.avatar_url {
            user.avatar_url = Some(v);
        }
        if let Some(v) = update.bio {
            user.bio = Some(v);
        }
        if let Some(v) = update.company {
            user.company = Some(v);
        }
        if let Some(v) = update.company_location {
            user.company_location = Some(v);
        }
        if let Some(v) = update.field_of_study {
            user.field_of_study = Some(v);
        }
        if let Some(v) = update.graduation_start_year {
            user.graduation_start_year = Some(v);
        }
        if let Some(v) = update.graduation_end_year {
            user.graduation_end_year = Some(v);
        }
        if let Some(v) = update.location {
            user.location = Some(v);
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.users.write().await.retain(|u| u.id != id);
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<UserSummary>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| {
                contains_ci(&u.firstname, query)
                    || contains_ci(&u.lastname, query)
                    || contains_ci(&u.username, query)
            })
            .map(UserSummary::from)
            .collect())
    }

    async fn filter(&self, filter: &PeopleFilter) -> Result<Vec<UserSummary>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| {
                let year_ok = match filter.graduation_start_year_range {
                    Some((start, end)) => u
                        .graduation_start_year
                        .map(|y| (y as i64) >= start && (y as i64) <= end)
                        .unwrap_or(false),
                    None => true,
                };
                let field_ok = |value: &Option<String>, wanted: &Option<String>| match wanted {
                    Some(w) => value.as_deref().map(|v| contains_ci(v, w)).unwrap_or(false),
                    None => true,
                };
                year_ok
                    && field_ok(&u.location, &filter.location)
                    && field_ok(&u.industry, &filter.industry)
                    && field_ok(&u.field_of_study, &filter.field_of_study)
                    && field_ok(&u.company, &filter.company)
            })
            .map(UserSummary::from)
            .collect())
    }
}

pub struct MemPostRepo {
    posts: RwLock<Vec<Post>>,
    next_id: AtomicI64,
}

#[async_trait]
impl PostRepo for MemPostRepo {
    async fn create(&self, post: NewPost) -> Result<Post> {
        let created = Post {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            content: post.content,
            media_urls: post.media_urls,
            author_id: post.author_id,
            created_at: Utc::now(),
        };
        self.posts.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>> {
        Ok(self.posts.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.posts.write().await.retain(|p| p.id != id);
        Ok(())
    }
}

pub struct MemCommentRepo {
    comments: RwLock<Vec<Comment>>,
    next_id: AtomicI64,
}

#[async_trait]
impl CommentRepo for MemCommentRepo {
    async fn create(&self, comment: NewComment) -> Result<Comment> {
        let created = Comment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            content: comment.content,
            post_id: comment.post_id,
            author_id: comment.author_id,
            created_at: Utc::now(),
        };
        self.comments.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_in_post(&self, comment_id: i64, post_id: i64) -> Result<Option<Comment>> {
        Ok(self
            .comments
            .read()
            .await
            .iter()
            .find(|c| c.id == comment_id && c.post_id == post_id)
            .cloned())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.comments.write().await.retain(|c| c.id != id);
        Ok(())
    }
}

pub struct MemLikeRepo {
    likes: RwLock<Vec<Like>>,
    next_id: AtomicI64,
}

#[async_trait]
impl LikeRepo for MemLikeRepo {
    async fn find(&self, post_id: i64, user_id: i64) -> Result<Option<Like>> {
        Ok(self
            .likes
            .read()
            .await
            .iter()
            .find(|l| l.post_id == post_id && l.user_id == user_id)
            .cloned())
    }

    async fn create(&self, post_id: i64, user_id: i64) -> Result<Like> {
        let created = Like {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            post_id,
            user_id,
            created_at: Utc::now(),
        };
        self.likes.write().await.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.likes.write().await.retain(|l| l.id != id);
        Ok(())
    }
}

pub struct MemConnectionRepo {
    connections: RwLock<Vec<Connection>>,
    users: SharedUsers,
    next_id: AtomicI64,
}

impl MemConnectionRepo {
    async fn summaries_for(&self, ids: Vec<i64>) -> Vec<UserSummary> {
        let users = self.users.read().await;
        ids.into_iter()
            .filter_map(|id| users.iter().find(|u| u.id == id).map(UserSummary::from))
            .collect()
    }
}

#[async_trait]
impl ConnectionRepo for MemConnectionRepo {
    async fn find_pair(&self, follower_id: i64, following_id: i64) -> Result<Option<Connection>> {
        Ok(self
            .connections
            .read()
            .await
            .iter()
            .find(|c| c.follower_id == follower_id && c.following_id == following_id)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Connection>> {
        Ok(self
            .connections
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, follower_id: i64, following_id: i64) -> Result<Connection> {
        let created = Connection {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            follower_id,
            following_id,
            status: ConnectionStatus::PENDING.into(),
            created_at: Utc::now(),
        };
        self.connections.write().await.push(created.clone());
        Ok(created)
    }

    async fn set_status(&self, id: i64, status: &str) -> Result<Connection> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DatabaseError::NotFound("connection".into()))?;
        connection.status = status.into();
        Ok(connection.clone())
    }

    async fn accepted_followers(&self, user_id: i64) -> Result<Vec<UserSummary>> {
        let ids: Vec<i64> = self
            .connections
            .read()
            .await
            .iter()
            .filter(|c| c.following_id == user_id && c.status == ConnectionStatus::ACCEPTED)
            .map(|c| c.follower_id)
            .collect();
        Ok(self.summaries_for(ids).await)
    }

    async fn accepted_followings(&self, user_id: i64) -> Result<Vec<UserSummary>> {
        let ids: Vec<i64> = self
            .connections
            .read()
            .await
            .iter()
            .filter(|c| c.follower_id == user_id && c.status == ConnectionStatus::ACCEPTED)
            .map(|c| c.following_id)
            .collect();
        Ok(self.summaries_for(ids).await)
    }
}

pub struct MemJobRepo {
    jobs: RwLock<Vec<Job>>,
    next_id: AtomicI64,
}

#[async_trait]
impl JobRepo for MemJobRepo {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let substring = |value: &str, wanted: &Option<String>| match wanted {
            Some(w) => contains_ci(value, w),
            None => true,
        };
        let exact = |value: &str, wanted: &Option<String>| match wanted {
            Some(w) => value == w,
            None => true,
        };
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|j| {
                substring(&j.title, &filter.title)
                    && substring(&j.company, &filter.company)
                    && exact(&j.experience, &filter.experience)
                    && substring(&j.location, &filter.location)
                    && exact(&j.job_type, &filter.job_type)
                    && substring(&j.industry, &filter.industry)
                    && substring(&j.job_function, &filter.job_function)
                    && exact(&j.remote, &filter.remote)
            })
            .cloned()
            .collect())
    }

    async fn create(&self, job: NewJob) -> Result<Job> {
        let created = Job {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: job.title,
            company: job.company,
            experience: job.experience,
            location: job.location,
            job_type: job.job_type,
            industry: job.industry,
            job_function: job.job_function,
            remote: job.remote,
            created_at: Utc::now(),
        };
        self.jobs.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Job>> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn update(&self, id: i64, job: NewJob) -> Result<Option<Job>> {
        let mut jobs = self.jobs.write().await;
        let Some(existing) = jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        existing.title = job.title;
        existing.company = job.company;
        existing.experience = job.experience;
        existing.location = job.location;
        existing.job_type = job.job_type;
        existing.industry = job.industry;
        existing.job_function = job.job_function;
        existing.remote = job.remote;
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        Ok(jobs.len() < before)
    }
}

pub struct MemEventRepo {
    events: RwLock<Vec<Event>>,
    next_id: AtomicI64,
}

#[async_trait]
impl EventRepo for MemEventRepo {
    async fn create(&self, event: NewEvent) -> Result<Event> {
        let created = Event {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: event.title,
            content: event.content,
            images: event.images,
            link: event.link,
            date: event.date,
            user_id: event.user_id,
            created_at: Utc::now(),
        };
        self.events.write().await.push(created.clone());
        Ok(created)
    }

    async fn upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.date > now)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn past(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.date < now)
            .cloned()
            .collect();
        events.sort_by_key(|e| std::cmp::Reverse(e.date));
        Ok(events)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.events.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.events.write().await.retain(|e| e.id != id);
        Ok(())
    }
}

pub struct MemFeedbackRepo {
    feedbacks: RwLock<Vec<Feedback>>,
    next_id: AtomicI64,
}

#[async_trait]
impl FeedbackRepo for MemFeedbackRepo {
    async fn create(&self, feedback: NewFeedback) -> Result<Feedback> {
        let created = Feedback {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            content: feedback.content,
            attached_file: feedback.attached_file,
            user_id: feedback.user_id,
            created_at: Utc::now(),
        };
        self.feedbacks.write().await.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        Ok(self.feedbacks.read().await.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>> {
        Ok(self
            .feedbacks
            .read()
            .await
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.feedbacks.write().await.retain(|f| f.id != id);
        Ok(())
    }
}

pub struct MemDonationRepo {
    donations: RwLock<Vec<Donation>>,
    users: SharedUsers,
    next_id: AtomicI64,
}

impl MemDonationRepo {
    async fn donor_summary(&self, donor_id: i64) -> Option<DonorSummary> {
        self.users.read().await.iter().find(|u| u.id == donor_id).map(|u| DonorSummary {
            id: u.id,
            firstname: u.firstname.clone(),
            lastname: u.lastname.clone(),
            avatar_url: u.avatar_url.clone(),
        })
    }
}

#[async_trait]
impl DonationRepo for MemDonationRepo {
    async fn list(&self) -> Result<Vec<DonationWithDonor>> {
        let donations = self.donations.read().await.clone();
        let mut out = Vec::with_capacity(donations.len());
        for donation in donations {
            if let Some(donor) = self.donor_summary(donation.donor_id).await {
                out.push(DonationWithDonor { donation, donor });
            }
        }
        Ok(out)
    }

    async fn create(&self, donation: NewDonation) -> Result<Donation> {
        let created = Donation {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            amount: donation.amount,
            currency: donation.currency,
            donor_id: donation.donor_id,
            created_at: Utc::now(),
        };
        self.donations.write().await.push(created.clone());
        Ok(created)
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let mut totals: HashMap<i64, f64> = HashMap::new();
        for donation in self.donations.read().await.iter() {
            *totals.entry(donation.donor_id).or_insert(0.0) += donation.amount;
        }
        let mut ranked: Vec<(i64, f64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit as usize);

        let mut entries = Vec::with_capacity(ranked.len());
        for (donor_id, total_amount) in ranked {
            if let Some(donor) = self.donor_summary(donor_id).await {
                entries.push(LeaderboardEntry {
                    donor,
                    total_amount,
                });
            }
        }
        Ok(entries)
    }
}

pub struct MemStoryRepo {
    stories: RwLock<Vec<SuccessStory>>,
    users: SharedUsers,
    next_id: AtomicI64,
}

#[async_trait]
impl StoryRepo for MemStoryRepo {
    async fn list_published(&self) -> Result<Vec<StoryWithAuthor>> {
        let stories: Vec<SuccessStory> = self
            .stories
            .read()
            .await
            .iter()
            .filter(|s| s.published)
            .cloned()
            .collect();
        let users = self.users.read().await;
        Ok(stories
            .into_iter()
            .filter_map(|story| {
                users
                    .iter()
                    .find(|u| u.id == story.author_id)
                    .map(|author| StoryWithAuthor {
                        author: UserSummary::from(author),
                        story,
                    })
            })
            .collect())
    }

    async fn create(&self, story: NewStory) -> Result<SuccessStory> {
        let created = SuccessStory {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: story.title,
            description: story.description,
            author_id: story.author_id,
            published: false,
            created_at: Utc::now(),
        };
        self.stories.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SuccessStory>> {
        Ok(self
            .stories
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn set_published(&self, id: i64, published: bool) -> Result<SuccessStory> {
        let mut stories = self.stories.write().await;
        let story = stories
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DatabaseError::NotFound("story".into()))?;
        story.published = published;
        Ok(story.clone())
    }
}

pub struct MemMessageRepo {
    messages: RwLock<Vec<Message>>,
    next_id: AtomicI64,
}

#[async_trait]
impl MessageRepo for MemMessageRepo {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        let created = Message {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            content: message.content,
            attachment: message.attachment,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            created_at: Utc::now(),
        };
        self.messages.write().await.push(created.clone());
        Ok(created)
    }

    async fn conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| {
                (m.sender_id == user_a && m.receiver_id == user_b)
                    || (m.sender_id == user_b && m.receiver_id == user_a)
            })
            .cloned()
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }
}

/// In-memory backend: the concrete fakes plus the state/app builders the
/// router tests use.
pub struct TestBackend {
    pub users: Arc<MemUserRepo>,
    pub posts: Arc<MemPostRepo>,
    pub comments: Arc<MemCommentRepo>,
    pub likes: Arc<MemLikeRepo>,
    pub connections: Arc<MemConnectionRepo>,
    pub jobs: Arc<MemJobRepo>,
    pub events: Arc<MemEventRepo>,
    pub feedbacks: Arc<MemFeedbackRepo>,
    pub donations: Arc<MemDonationRepo>,
    pub stories: Arc<MemStoryRepo>,
    pub messages: Arc<MemMessageRepo>,
    pub publisher: Arc<CountingPublisher>,
}

impl TestBackend {
    pub fn new() -> Self {
        let shared_users: SharedUsers = Arc::new(RwLock::new(Vec::new()));
        Self {
            users: Arc::new(MemUserRepo {
                users: shared_users.clone(),
                next_id: AtomicI64::new(1),
            }),
            posts: Arc::new(MemPostRepo {
                posts: RwLock::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }),
            comments: Arc::new(MemCommentRepo {
                comments: RwLock::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }),
            likes: Arc::new(MemLikeRepo {
                likes: RwLock::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }),
            connections: Arc::new(MemConnectionRepo {
                connections: RwLock::new(Vec::new()),
                users: shared_users.clone(),
                next_id: AtomicI64::new(1),
            }),
            jobs: Arc::new(MemJobRepo {
                jobs: RwLock::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }),
            events: Arc::new(MemEventRepo {
                events: RwLock::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }),
            feedbacks: Arc::new(MemFeedbackRepo {
                feedbacks: RwLock::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }),
            donations: Arc::new(MemDonationRepo {
                donations: RwLock::new(Vec::new()),
                users: shared_users.clone(),
                next_id: AtomicI64::new(1),
            }),
            stories: Arc::new(MemStoryRepo {
                stories: RwLock::new(Vec::new()),
                users: shared_users,
                next_id: AtomicI64::new(1),
            }),
            messages: Arc::new(MemMessageRepo {
                messages: RwLock::new(Vec::new()),
                next_id: AtomicI64::new(1),
            }),
            publisher: Arc::new(CountingPublisher::default()),
        }
    }

    pub fn state(&self) -> AppState {
        let repos = Repositories {
            users: self.users.clone(),
            posts: self.posts.clone(),
            comments: self.comments.clone(),
            likes: self.likes.clone(),
            connections: self.connections.clone(),
            jobs: self.jobs.clone(),
            events: self.events.clone(),
            feedbacks: self.feedbacks.clone(),
            donations: self.donations.clone(),
            stories: self.stories.clone(),
            messages: self.messages.clone(),
        };
        AppState::new(repos, self.publisher.clone())
    }

    pub fn app(&self) -> Router {
        crate::routes::app(self.state())
    }

    /// Insert a user directly and mint a token for them. The stored hash is a
    /// placeholder; signin flows go through the real signup endpoint instead.
    pub async fn seed_user(&self, username: &str) -> (User, String) {
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                firstname: capitalize(username),
                lastname: "Tester".into(),
                email: format!("{}@example.edu", username),
                password_hash: "seeded-placeholder-hash".into(),
            })
            .await
            .expect("seed user");
        let token = auth::issue_token(user.id, 1).expect("mint token");
        (user, token)
    }

    pub async fn promote_admin(&self, user_id: i64) {
        let mut users = self.users.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.role = "ADMIN".into();
        }
    }

    pub async fn set_profile(
        &self,
        user_id: i64,
        location: Option<&str>,
        industry: Option<&str>,
        graduation_start_year: Option<i32>,
    ) {
        let mut users = self.users.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.location = location.map(String::from);
            user.industry = industry.map(String::from);
            user.graduation_start_year = graduation_start_year;
        }
    }

    pub async fn seed_post(&self, author_id: i64, content: &str) -> Post {
        self.posts
            .create(NewPost {
                content: content.to_string(),
                media_urls: Vec::new(),
                author_id,
            })
            .await
            .expect("seed post")
    }

    pub async fn seed_comment(&self, post_id: i64, author_id: i64, content: &str) -> Comment {
        self.comments
            .create(NewComment {
                content: content.to_string(),
                post_id,
                author_id,
            })
            .await
            .expect("seed comment")
    }

    pub async fn seed_event(&self, user_id: i64, title: &str) -> Event {
        self.events
            .create(NewEvent {
                title: title.to_string(),
                content: "seeded event".into(),
                images: None,
                link: None,
                date: Utc::now() + Duration::days(7),
                user_id,
            })
            .await
            .expect("seed event")
    }

    pub async fn seed_feedback(&self, user_id: i64, content: &str) -> Feedback {
        self.feedbacks
            .create(NewFeedback {
                content: content.to_string(),
                attached_file: None,
                user_id,
            })
            .await
            .expect("seed feedback")
    }

    /// Send a connection request through the router and return the new edge id.
    pub async fn seed_connection_from_token(
        &self,
        follower_token: &str,
        following_id: i64,
        app: &Router,
    ) -> i64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/connection/connections",
            Some(follower_token),
            Some(json!({ "followingId": following_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "seed connection failed: {body}");
        body["data"]["id"].as_i64().expect("connection id")
    }

    pub async fn user_count(&self) -> usize {
        self.users.users.read().await.len()
    }

    pub async fn user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .find_by_username(username)
            .await
            .expect("user lookup")
    }

    pub async fn post_count(&self) -> usize {
        self.posts.posts.read().await.len()
    }

    pub async fn comment_count(&self) -> usize {
        self.comments.comments.read().await.len()
    }

    pub async fn like_count(&self, post_id: i64) -> usize {
        self.likes
            .likes
            .read()
            .await
            .iter()
            .filter(|l| l.post_id == post_id)
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.connections.read().await.len()
    }

    pub async fn connection_status(&self, id: i64) -> Option<String> {
        self.connections
            .connections
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.status.clone())
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.jobs.read().await.len()
    }

    pub async fn event_count(&self) -> usize {
        self.events.events.read().await.len()
    }

    pub async fn feedback_count(&self) -> usize {
        self.feedbacks.feedbacks.read().await.len()
    }

    pub async fn donation_count(&self) -> usize {
        self.donations.donations.read().await.len()
    }

    pub async fn story_count(&self) -> usize {
        self.stories.stories.read().await.len()
    }

    pub async fn story_published(&self, id: i64) -> Option<bool> {
        self.stories
            .stories
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.published)
    }

    pub async fn message_count(&self) -> usize {
        self.messages.messages.read().await.len()
    }

    pub fn published_events(&self) -> usize {
        self.publisher.published.load(Ordering::SeqCst)
    }
}

/// Drive one request through the router; returns status and parsed JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Complete, valid signup payload for `username`.
pub fn signup_body(username: &str) -> Value {
    json!({
        "username": username,
        "firstname": capitalize(username),
        "lastname": "Tester",
        "email": format!("{}@example.edu", username),
        "password": format!("pass-{}-123", username),
    })
}

/// Complete, valid job payload.
pub fn job_body(title: &str, company: &str) -> Value {
    json!({
        "title": title,
        "company": company,
        "experience": "5+ years",
        "location": "Lisbon",
        "jobType": "Full-time",
        "industry": "Software",
        "jobFunction": "Engineering",
        "remote": "hybrid",
    })
}
