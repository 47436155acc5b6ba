use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, Course, CourseProgress, CourseSummary, Profile, RatingAndReview, Section,
    SubSection, User,
};

/// Typed store access, one repository per entity. All reads are keyed by
/// identifier; reference expansion happens in the service layer via the
/// `find_many` lookups. Reference lists live in uuid[] columns, so the
/// enrollment/authorship link updates are array operations.
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Full scan with the restricted public projection.
    pub async fn find_summaries(&self) -> Result<Vec<CourseSummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, CourseSummary>(
            "SELECT id, course_name, price, thumbnail, instructor, ratings_and_reviews, \
             students_enrolled FROM courses",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, DatabaseError> {
        let row = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Newest-first listing of an instructor's courses.
    pub async fn find_by_instructor(&self, instructor: Uuid) -> Result<Vec<Course>, DatabaseError> {
        let rows = sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE instructor = $1 ORDER BY created_at DESC",
        )
        .bind(instructor)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert(&self, course: &Course) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO courses (id, course_name, course_description, instructor, \
             what_you_will_learn, price, tag, category, instructions, status, course_content, \
             students_enrolled, ratings_and_reviews, thumbnail, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(course.id)
        .bind(&course.course_name)
        .bind(&course.course_description)
        .bind(course.instructor)
        .bind(&course.what_you_will_learn)
        .bind(course.price)
        .bind(&course.tag)
        .bind(course.category)
        .bind(&course.instructions)
        .bind(&course.status)
        .bind(&course.course_content)
        .bind(&course.students_enrolled)
        .bind(&course.ratings_and_reviews)
        .bind(&course.thumbnail)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Overwrite the updatable attributes of an existing course.
    pub async fn update(&self, course: &Course) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE courses SET course_name = $2, course_description = $3, \
             what_you_will_learn = $4, price = $5, tag = $6, category = $7, \
             instructions = $8, status = $9, thumbnail = $10, updated_at = now() \
             WHERE id = $1",
        )
        .bind(course.id)
        .bind(&course.course_name)
        .bind(&course.course_description)
        .bind(&course.what_you_will_learn)
        .bind(course.price)
        .bind(&course.tag)
        .bind(course.category)
        .bind(&course.instructions)
        .bind(&course.status)
        .bind(&course.thumbnail)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, DatabaseError> {
        let row = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Append a course reference to the user's course list.
    pub async fn push_course(&self, user_id: Uuid, course_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE users SET courses = array_append(courses, $2), updated_at = now() \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a course reference from the user's course list.
    pub async fn pull_course(&self, user_id: Uuid, course_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE users SET courses = array_remove(courses, $2), updated_at = now() \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn push_course(
        &self,
        category_id: Uuid,
        course_id: Uuid,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE categories SET courses = array_append(courses, $2) WHERE id = $1")
            .bind(category_id)
            .bind(course_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct SectionRepository {
    pool: PgPool,
}

impl SectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Section>, DatabaseError> {
        let row = sqlx::query_as::<_, Section>("SELECT * FROM sections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Fetch sections by id. Result order is the store's, not the reference
    /// list's; callers restore display order.
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Section>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, Section>("SELECT * FROM sections WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct SubSectionRepository {
    pool: PgPool,
}

impl SubSectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<SubSection>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, SubSection>("SELECT * FROM sub_sections WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM sub_sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lookup by the (course, user) composite key.
    pub async fn find(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<CourseProgress>, DatabaseError> {
        let row = sqlx::query_as::<_, CourseProgress>(
            "SELECT * FROM course_progress WHERE course_id = $1 AND user_id = $2",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<RatingAndReview>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows =
            sqlx::query_as::<_, RatingAndReview>("SELECT * FROM rating_and_reviews WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }
}
