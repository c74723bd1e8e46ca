//! Postgres-backed repository implementations.
//!
//! Controllers never see SQL; everything here is plain parameterized queries
//! against the shared pool. Optional filters use `($n IS NULL OR ...)` guards
//! so each operation stays a single static statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use super::manager::DatabaseError;
use super::models::{
    Comment, Connection, ConnectionStatus, Donation, DonationWithDonor, DonorSummary, Event,
    Feedback, Job, JobFilter, LeaderboardEntry, Like, Message, PeopleFilter, Post,
    StoryWithAuthor, SuccessStory, User, UserSummary,
};
use super::repository::{
    CommentRepo, ConnectionRepo, DonationRepo, EventRepo, FeedbackRepo, JobRepo, LikeRepo,
    MessageRepo, NewComment, NewDonation, NewEvent, NewFeedback, NewJob, NewMessage, NewPost,
    NewStory, NewUser, PostRepo, StoryRepo, UserRepo, UserUpdate,
};

type Result<T> = std::result::Result<T, DatabaseError>;

const USER_SUMMARY_COLUMNS: &str = "u.id, u.firstname, u.lastname, u.avatar_url, u.bio, u.company";

fn contains_pattern(needle: &str) -> String {
    format!("%{}%", needle)
}

pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, firstname, lastname, email, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&user.username)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
                firstname = COALESCE($2::text, firstname), \
                lastname = COALESCE($3::text, lastname), \
                password_hash = COALESCE($4::text, password_hash), \
                avatar_url = COALESCE($5::text, avatar_url), \
                bio = COALESCE($6::text, bio), \
                company = COALESCE($7::text, company), \
                company_location = COALESCE($8::text, company_location), \
                field_of_study = COALESCE($9::text, field_of_study), \
                graduation_start_year = COALESCE($10::int, graduation_start_year), \
                graduation_end_year = COALESCE($11::int, graduation_end_year), \
                location = COALESCE($12::text, location) \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.firstname)
        .bind(&update.lastname)
        .bind(&update.password_hash)
        .bind(&update.avatar_url)
        .bind(&update.bio)
        .bind(&update.company)
        .bind(&update.company_location)
        .bind(&update.field_of_study)
        .bind(update.graduation_start_year)
        .bind(update.graduation_end_year)
        .bind(&update.location)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<UserSummary>> {
        let sql = format!(
            "SELECT {USER_SUMMARY_COLUMNS} FROM users u \
             WHERE u.firstname ILIKE $1 OR u.lastname ILIKE $1 OR u.username ILIKE $1 \
             ORDER BY u.id"
        );
        let users = sqlx::query_as::<_, UserSummary>(&sql)
            .bind(contains_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn filter(&self, filter: &PeopleFilter) -> Result<Vec<UserSummary>> {
        let sql = format!(
            "SELECT {USER_SUMMARY_COLUMNS} FROM users u \
             WHERE ($1::bigint IS NULL OR u.graduation_start_year >= $1) \
               AND ($2::bigint IS NULL OR u.graduation_start_year <= $2) \
               AND ($3::text IS NULL OR u.location ILIKE $3) \
               AND ($4::text IS NULL OR u.industry ILIKE $4) \
               AND ($5::text IS NULL OR u.field_of_study ILIKE $5) \
               AND ($6::text IS NULL OR u.company ILIKE $6) \
             ORDER BY u.id"
        );
        let (range_start, range_end) = match filter.graduation_start_year_range {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        let users = sqlx::query_as::<_, UserSummary>(&sql)
            .bind(range_start)
            .bind(range_end)
            .bind(filter.location.as_deref().map(contains_pattern))
            .bind(filter.industry.as_deref().map(contains_pattern))
            .bind(filter.field_of_study.as_deref().map(contains_pattern))
            .bind(filter.company.as_deref().map(contains_pattern))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}

pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn create(&self, post: NewPost) -> Result<Post> {
        let created = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (content, media_urls, author_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&post.content)
        .bind(&post.media_urls)
        .bind(post.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgCommentRepo {
    pool: PgPool,
}

impl PgCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepo for PgCommentRepo {
    async fn create(&self, comment: NewComment) -> Result<Comment> {
        let created = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (content, post_id, author_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&comment.content)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_in_post(&self, comment_id: i64, post_id: i64) -> Result<Option<Comment>> {
        let comment =
            sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1 AND post_id = $2")
                .bind(comment_id)
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgLikeRepo {
    pool: PgPool,
}

impl PgLikeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepo for PgLikeRepo {
    async fn find(&self, post_id: i64, user_id: i64) -> Result<Option<Like>> {
        let like =
            sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE post_id = $1 AND user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(like)
    }

    async fn create(&self, post_id: i64, user_id: i64) -> Result<Like> {
        let like = sqlx::query_as::<_, Like>(
            "INSERT INTO likes (post_id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(like)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgConnectionRepo {
    pool: PgPool,
}

impl PgConnectionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn accepted_peers(&self, user_id: i64, pivot: &str) -> Result<Vec<UserSummary>> {
        // pivot is one of two fixed column names, never user input
        let (join_on, where_on) = match pivot {
            "follower_id" => ("c.follower_id", "c.following_id"),
            _ => ("c.following_id", "c.follower_id"),
        };
        let sql = format!(
            "SELECT {USER_SUMMARY_COLUMNS} FROM connections c \
             JOIN users u ON u.id = {join_on} \
             WHERE {where_on} = $1 AND c.status = $2 \
             ORDER BY c.created_at"
        );
        let users = sqlx::query_as::<_, UserSummary>(&sql)
            .bind(user_id)
            .bind(ConnectionStatus::ACCEPTED)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}

#[async_trait]
impl ConnectionRepo for PgConnectionRepo {
    async fn find_pair(&self, follower_id: i64, following_id: i64) -> Result<Option<Connection>> {
        let connection = sqlx::query_as::<_, Connection>(
            "SELECT * FROM connections WHERE follower_id = $1 AND following_id = $2",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(connection)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Connection>> {
        let connection = sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(connection)
    }

    async fn create(&self, follower_id: i64, following_id: i64) -> Result<Connection> {
        let connection = sqlx::query_as::<_, Connection>(
            "INSERT INTO connections (follower_id, following_id, status) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(follower_id)
        .bind(following_id)
        .bind(ConnectionStatus::PENDING)
        .fetch_one(&self.pool)
        .await?;
        Ok(connection)
    }

    async fn set_status(&self, id: i64, status: &str) -> Result<Connection> {
        let connection = sqlx::query_as::<_, Connection>(
            "UPDATE connections SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(connection)
    }

    async fn accepted_followers(&self, user_id: i64) -> Result<Vec<UserSummary>> {
        self.accepted_peers(user_id, "follower_id").await
    }

    async fn accepted_followings(&self, user_id: i64) -> Result<Vec<UserSummary>> {
        self.accepted_peers(user_id, "following_id").await
    }
}

pub struct PgJobRepo {
    pool: PgPool,
}

impl PgJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepo for PgJobRepo {
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs \
             WHERE ($1::text IS NULL OR title ILIKE $1) \
               AND ($2::text IS NULL OR company ILIKE $2) \
               AND ($3::text IS NULL OR experience = $3) \
               AND ($4::text IS NULL OR location ILIKE $4) \
               AND ($5::text IS NULL OR job_type = $5) \
               AND ($6::text IS NULL OR industry ILIKE $6) \
               AND ($7::text IS NULL OR job_function ILIKE $7) \
               AND ($8::text IS NULL OR remote = $8) \
             ORDER BY id",
        )
        .bind(filter.title.as_deref().map(contains_pattern))
        .bind(filter.company.as_deref().map(contains_pattern))
        .bind(&filter.experience)
        .bind(filter.location.as_deref().map(contains_pattern))
        .bind(&filter.job_type)
        .bind(filter.industry.as_deref().map(contains_pattern))
        .bind(filter.job_function.as_deref().map(contains_pattern))
        .bind(&filter.remote)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn create(&self, job: NewJob) -> Result<Job> {
        let created = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs \
                (title, company, experience, location, job_type, industry, job_function, remote) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.experience)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.industry)
        .bind(&job.job_function)
        .bind(&job.remote)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn update(&self, id: i64, job: NewJob) -> Result<Option<Job>> {
        let updated = sqlx::query_as::<_, Job>(
            "UPDATE jobs SET title = $2, company = $3, experience = $4, location = $5, \
                job_type = $6, industry = $7, job_function = $8, remote = $9 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.experience)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(&job.industry)
        .bind(&job.job_function)
        .bind(&job.remote)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgEventRepo {
    pool: PgPool,
}

impl PgEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepo for PgEventRepo {
    async fn create(&self, event: NewEvent) -> Result<Event> {
        let created = sqlx::query_as::<_, Event>(
            "INSERT INTO events (title, content, images, link, date, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&event.title)
        .bind(&event.content)
        .bind(&event.images)
        .bind(&event.link)
        .bind(event.date)
        .bind(event.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn upcoming(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let events =
            sqlx::query_as::<_, Event>("SELECT * FROM events WHERE date > $1 ORDER BY date ASC")
                .bind(now)
                .fetch_all(&self.pool)
                .await?;
        Ok(events)
    }

    async fn past(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let events =
            sqlx::query_as::<_, Event>("SELECT * FROM events WHERE date < $1 ORDER BY date DESC")
                .bind(now)
                .fetch_all(&self.pool)
                .await?;
        Ok(events)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgFeedbackRepo {
    pool: PgPool,
}

impl PgFeedbackRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackRepo for PgFeedbackRepo {
    async fn create(&self, feedback: NewFeedback) -> Result<Feedback> {
        let created = sqlx::query_as::<_, Feedback>(
            "INSERT INTO feedbacks (content, attached_file, user_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&feedback.content)
        .bind(&feedback.attached_file)
        .bind(feedback.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Feedback>> {
        let feedbacks = sqlx::query_as::<_, Feedback>("SELECT * FROM feedbacks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(feedbacks)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>("SELECT * FROM feedbacks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(feedback)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM feedbacks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct PgDonationRepo {
    pool: PgPool,
}

impl PgDonationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationRepo for PgDonationRepo {
    async fn list(&self) -> Result<Vec<DonationWithDonor>> {
        let rows = sqlx::query(
            "SELECT d.id, d.amount, d.currency, d.donor_id, d.created_at, \
                    u.firstname, u.lastname, u.avatar_url \
             FROM donations d JOIN users u ON u.id = d.donor_id \
             ORDER BY d.id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut donations = Vec::with_capacity(rows.len());
        for row in rows {
            donations.push(DonationWithDonor {
                donation: Donation {
                    id: row.try_get("id")?,
                    amount: row.try_get("amount")?,
                    currency: row.try_get("currency")?,
                    donor_id: row.try_get("donor_id")?,
                    created_at: row.try_get("created_at")?,
                },
                donor: DonorSummary {
                    id: row.try_get("donor_id")?,
                    firstname: row.try_get("firstname")?,
                    lastname: row.try_get("lastname")?,
                    avatar_url: row.try_get("avatar_url")?,
                },
            });
        }
        Ok(donations)
    }

    async fn create(&self, donation: NewDonation) -> Result<Donation> {
        let created = sqlx::query_as::<_, Donation>(
            "INSERT INTO donations (amount, currency, donor_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(donation.amount)
        .bind(&donation.currency)
        .bind(donation.donor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query(
            "SELECT u.id, u.firstname, u.lastname, u.avatar_url, \
                    SUM(d.amount) AS total_amount \
             FROM donations d JOIN users u ON u.id = d.donor_id \
             GROUP BY u.id, u.firstname, u.lastname, u.avatar_url \
             ORDER BY total_amount DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(LeaderboardEntry {
                donor: DonorSummary {
                    id: row.try_get("id")?,
                    firstname: row.try_get("firstname")?,
                    lastname: row.try_get("lastname")?,
                    avatar_url: row.try_get("avatar_url")?,
                },
                total_amount: row.try_get("total_amount")?,
            });
        }
        Ok(entries)
    }
}

pub struct PgStoryRepo {
    pool: PgPool,
}

impl PgStoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryRepo for PgStoryRepo {
    async fn list_published(&self) -> Result<Vec<StoryWithAuthor>> {
        let rows = sqlx::query(
            "SELECT s.id, s.title, s.description, s.author_id, s.published, s.created_at, \
                    u.firstname, u.lastname, u.avatar_url, u.bio, u.company \
             FROM success_stories s JOIN users u ON u.id = s.author_id \
             WHERE s.published \
             ORDER BY s.id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stories = Vec::with_capacity(rows.len());
        for row in rows {
            stories.push(StoryWithAuthor {
                story: SuccessStory {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    author_id: row.try_get("author_id")?,
                    published: row.try_get("published")?,
                    created_at: row.try_get("created_at")?,
                },
                author: UserSummary {
                    id: row.try_get("author_id")?,
                    firstname: row.try_get("firstname")?,
                    lastname: row.try_get("lastname")?,
                    avatar_url: row.try_get("avatar_url")?,
                    bio: row.try_get("bio")?,
                    company: row.try_get("company")?,
                },
            });
        }
        Ok(stories)
    }

    async fn create(&self, story: NewStory) -> Result<SuccessStory> {
        let created = sqlx::query_as::<_, SuccessStory>(
            "INSERT INTO success_stories (title, description, author_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&story.title)
        .bind(&story.description)
        .bind(story.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SuccessStory>> {
        let story =
            sqlx::query_as::<_, SuccessStory>("SELECT * FROM success_stories WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(story)
    }

    async fn set_published(&self, id: i64, published: bool) -> Result<SuccessStory> {
        let story = sqlx::query_as::<_, SuccessStory>(
            "UPDATE success_stories SET published = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(published)
        .fetch_one(&self.pool)
        .await?;
        Ok(story)
    }
}

pub struct PgMessageRepo {
    pool: PgPool,
}

impl PgMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepo for PgMessageRepo {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        let created = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (content, attachment, sender_id, receiver_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&message.content)
        .bind(&message.attachment)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages \
             WHERE (sender_id = $1 AND receiver_id = $2) \
                OR (sender_id = $2 AND receiver_id = $1) \
             ORDER BY created_at ASC",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }
}
