use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseManager, DatabaseError};
use crate::database::models::{
    Category, Course, CourseSummary, Profile, RatingAndReview, SubSection, User,
};
use crate::database::repository::{
    CategoryRepository, CourseRepository, ProgressRepository, ReviewRepository, SectionRepository,
    SubSectionRepository, UserRepository,
};
use crate::services::duration::{convert_seconds_to_duration, parse_duration_seconds};
use crate::services::upload_service::{CloudinaryClient, ImageStorage, UploadError};

#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("Instructor not found")]
    InstructorNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    /// Detail lookups report the missing id; historically a 400.
    #[error("No course found with id: {0}")]
    CourseMissing(Uuid),

    /// Mutating operations report a plain 404.
    #[error("Course not found")]
    CourseNotFound,

    #[error("Course progress not found")]
    ProgressNotFound,

    #[error("Invalid JSON in field '{0}'")]
    MalformedField(&'static str),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// An image file received from the caller, destined for the asset host.
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Validated input for course creation. Field presence is checked at the
/// HTTP boundary; everything here is already typed.
pub struct NewCourseInput {
    pub course_name: String,
    pub course_description: String,
    pub what_you_will_learn: String,
    pub price: Decimal,
    pub category: Uuid,
    pub tag: Vec<String>,
    pub instructions: Vec<String>,
    pub thumbnail: ImageFile,
}

/// Allow-list of updatable course attributes. Only these fields can be
/// overwritten by an edit; anything else on the record is untouchable.
#[derive(Debug, Default)]
pub struct CourseUpdates {
    pub course_name: Option<String>,
    pub course_description: Option<String>,
    pub what_you_will_learn: Option<String>,
    pub price: Option<Decimal>,
    pub tag: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub category: Option<Uuid>,
    pub status: Option<String>,
}

/// Instructor record with the extended profile expanded inline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedInstructor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub image: Option<String>,
    pub additional_details: Option<Profile>,
}

impl ExpandedInstructor {
    fn from_parts(user: User, profile: Option<Profile>) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            image: user.image,
            additional_details: profile,
        }
    }
}

/// One section of the content tree with its media entries expanded, in
/// reference-list order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: Uuid,
    pub section_name: String,
    pub sub_sections: Vec<SubSection>,
}

/// Fully expanded course: instructor (+profile), category, reviews, and the
/// ordered content tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub id: Uuid,
    pub course_name: String,
    pub course_description: String,
    pub instructor: Option<ExpandedInstructor>,
    pub what_you_will_learn: String,
    pub price: Decimal,
    pub tag: Vec<String>,
    pub category: Option<Category>,
    pub instructions: Vec<String>,
    pub status: String,
    pub students_enrolled: Vec<Uuid>,
    pub ratings_and_reviews: Vec<RatingAndReview>,
    pub course_content: Vec<SectionView>,
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public listing entry: the restricted projection with the instructor
/// expanded to the full user record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummaryView {
    pub id: Uuid,
    pub course_name: String,
    pub price: Decimal,
    pub thumbnail: String,
    pub instructor: Option<User>,
    pub ratings_and_reviews: Vec<Uuid>,
    pub students_enrolled: Vec<Uuid>,
}

/// Payload of the enrolled-caller detail view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullCourseData {
    pub course_details: CourseView,
    pub total_duration: String,
    pub completed_videos: Vec<Uuid>,
}

/// Outcome of a progress-percentage lookup for an existing record.
#[derive(Debug, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// The record exists but tracks no videos; reported as success with 0%.
    NoVideos,
    Percentage(u32),
}

/// Stateless aggregation service over the course graph. Constructed per
/// request; every operation reads fresh from the store.
pub struct CourseService {
    courses: CourseRepository,
    users: UserRepository,
    categories: CategoryRepository,
    sections: SectionRepository,
    sub_sections: SubSectionRepository,
    progress: ProgressRepository,
    reviews: ReviewRepository,
    storage: Arc<dyn ImageStorage>,
}

impl CourseService {
    pub async fn new() -> Result<Self, CourseError> {
        let pool = DatabaseManager::main_pool().await?;
        Ok(Self {
            courses: CourseRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            sections: SectionRepository::new(pool.clone()),
            sub_sections: SubSectionRepository::new(pool.clone()),
            progress: ProgressRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool),
            storage: Arc::new(CloudinaryClient::from_config()),
        })
    }

    /// Public course listing: restricted projection, instructor expanded.
    pub async fn get_all_courses(&self) -> Result<Vec<CourseSummaryView>, CourseError> {
        let summaries = self.courses.find_summaries().await?;

        let mut instructor_ids: Vec<Uuid> = summaries.iter().map(|s| s.instructor).collect();
        instructor_ids.sort_unstable();
        instructor_ids.dedup();

        let instructors: HashMap<Uuid, User> = self
            .users
            .find_many(&instructor_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(summaries
            .into_iter()
            .map(|s: CourseSummary| {
                let instructor = instructors.get(&s.instructor).cloned();
                CourseSummaryView {
                    id: s.id,
                    course_name: s.course_name,
                    price: s.price,
                    thumbnail: s.thumbnail,
                    instructor,
                    ratings_and_reviews: s.ratings_and_reviews,
                    students_enrolled: s.students_enrolled,
                }
            })
            .collect())
    }

    /// Course detail for the public course page.
    pub async fn get_course_details(&self, course_id: Uuid) -> Result<CourseView, CourseError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::CourseMissing(course_id))?;
        self.expand_course(course).await
    }

    /// Detail for an enrolled caller: expansion plus progress and total
    /// runtime, both derived fresh.
    pub async fn get_full_course_details(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> Result<FullCourseData, CourseError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::CourseMissing(course_id))?;
        let course_details = self.expand_course(course).await?;

        let progress = self.progress.find(course_id, user_id).await?;

        let total_seconds = total_duration_seconds(&course_details.course_content);

        Ok(FullCourseData {
            total_duration: convert_seconds_to_duration(total_seconds),
            // Absent record means no progress yet, never a null list.
            completed_videos: progress.map(|p| p.completed_videos).unwrap_or_default(),
            course_details,
        })
    }

    pub async fn get_progress_percentage(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> Result<ProgressOutcome, CourseError> {
        let progress = self
            .progress
            .find(course_id, user_id)
            .await?
            .ok_or(CourseError::ProgressNotFound)?;

        let total = progress.total_videos.max(0) as u32;
        if total == 0 {
            return Ok(ProgressOutcome::NoVideos);
        }

        Ok(ProgressOutcome::Percentage(progress_percentage(
            progress.completed_videos.len(),
            total,
        )))
    }

    /// Create a course and link it into the instructor's and category's
    /// course lists. The dependent list writes follow the primary insert
    /// sequentially; a failure partway leaves prior steps committed.
    pub async fn create_course(
        &self,
        instructor_id: Uuid,
        input: NewCourseInput,
    ) -> Result<Course, CourseError> {
        let instructor = self
            .users
            .find_by_id(instructor_id)
            .await?
            .ok_or(CourseError::InstructorNotFound)?;

        let category = self
            .categories
            .find_by_id(input.category)
            .await?
            .ok_or(CourseError::CategoryNotFound)?;

        let storage_cfg = &config::config().storage;
        let thumbnail = self
            .storage
            .upload_image(
                &input.thumbnail.file_name,
                input.thumbnail.bytes,
                &storage_cfg.folder,
                Some(storage_cfg.thumbnail_max_width),
                Some(storage_cfg.thumbnail_max_height),
            )
            .await?;

        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            course_name: input.course_name,
            course_description: input.course_description,
            instructor: instructor.id,
            what_you_will_learn: input.what_you_will_learn,
            price: input.price,
            tag: input.tag,
            category: category.id,
            instructions: input.instructions,
            status: "Draft".to_string(),
            course_content: vec![],
            students_enrolled: vec![],
            ratings_and_reviews: vec![],
            thumbnail,
            created_at: now,
            updated_at: now,
        };

        self.courses.insert(&course).await?;

        self.users.push_course(instructor.id, course.id).await?;
        self.categories.push_course(category.id, course.id).await?;

        tracing::info!("Created course {} for instructor {}", course.id, instructor.id);
        Ok(course)
    }

    /// Apply an allow-listed update set (and optionally a new thumbnail),
    /// then return the re-expanded course.
    pub async fn edit_course(
        &self,
        course_id: Uuid,
        updates: CourseUpdates,
        new_thumbnail: Option<ImageFile>,
    ) -> Result<CourseView, CourseError> {
        let mut course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::CourseNotFound)?;

        if let Some(file) = new_thumbnail {
            let folder = &config::config().storage.folder;
            course.thumbnail = self
                .storage
                .upload_image(&file.file_name, file.bytes, folder, None, None)
                .await?;
        }

        apply_updates(&mut course, updates);
        self.courses.update(&course).await?;

        let updated = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::CourseNotFound)?;
        self.expand_course(updated).await
    }

    /// Newest-first listing of the caller's own courses.
    pub async fn get_instructor_courses(
        &self,
        instructor_id: Uuid,
    ) -> Result<Vec<Course>, CourseError> {
        Ok(self.courses.find_by_instructor(instructor_id).await?)
    }

    /// Delete a course: unlink every enrolled student, cascade-delete the
    /// content tree (sub-sections before their section), then remove the
    /// course itself. Dependents go first so a partial failure never leaves
    /// references to a missing course.
    pub async fn delete_course(&self, course_id: Uuid) -> Result<(), CourseError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or(CourseError::CourseNotFound)?;

        for student_id in &course.students_enrolled {
            self.users.pull_course(*student_id, course.id).await?;
        }

        for section_id in &course.course_content {
            if let Some(section) = self.sections.find_by_id(*section_id).await? {
                for sub_section_id in &section.sub_sections {
                    self.sub_sections.delete(*sub_section_id).await?;
                }
            }
            self.sections.delete(*section_id).await?;
        }

        self.courses.delete(course.id).await?;

        tracing::info!("Deleted course {}", course.id);
        Ok(())
    }

    /// Resolve the full course graph: instructor (+extended profile),
    /// category, reviews, and the content tree in reference-list order.
    async fn expand_course(&self, course: Course) -> Result<CourseView, CourseError> {
        let instructor = match self.users.find_by_id(course.instructor).await? {
            Some(user) => {
                let profile = match user.additional_details {
                    Some(profile_id) => self.users.find_profile(profile_id).await?,
                    None => None,
                };
                Some(ExpandedInstructor::from_parts(user, profile))
            }
            None => None,
        };

        let category = self.categories.find_by_id(course.category).await?;

        let reviews = self.reviews.find_many(&course.ratings_and_reviews).await?;

        let sections = order_by_reference(
            &course.course_content,
            self.sections.find_many(&course.course_content).await?,
            |s| s.id,
        );

        let mut course_content = Vec::with_capacity(sections.len());
        for section in sections {
            let sub_sections = order_by_reference(
                &section.sub_sections,
                self.sub_sections.find_many(&section.sub_sections).await?,
                |s| s.id,
            );
            course_content.push(SectionView {
                id: section.id,
                section_name: section.section_name,
                sub_sections,
            });
        }

        Ok(CourseView {
            id: course.id,
            course_name: course.course_name,
            course_description: course.course_description,
            instructor,
            what_you_will_learn: course.what_you_will_learn,
            price: course.price,
            tag: course.tag,
            category,
            instructions: course.instructions,
            status: course.status,
            students_enrolled: course.students_enrolled,
            ratings_and_reviews: reviews,
            course_content,
            thumbnail: course.thumbnail,
            created_at: course.created_at,
            updated_at: course.updated_at,
        })
    }
}

/// Restore reference-list order over rows fetched by `= ANY(...)`. Ids with
/// no matching row are skipped; rows not in the list are dropped.
pub fn order_by_reference<T>(ids: &[Uuid], items: Vec<T>, id_of: fn(&T) -> Uuid) -> Vec<T> {
    let mut by_id: HashMap<Uuid, T> = items.into_iter().map(|item| (id_of(&item), item)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

/// Sum every sub-section duration across the content tree. The value is
/// order-independent; display order is carried by the tree itself.
pub fn total_duration_seconds(content: &[SectionView]) -> u64 {
    content
        .iter()
        .flat_map(|section| section.sub_sections.iter())
        .map(|sub| parse_duration_seconds(sub.time_duration.as_deref()))
        .sum()
}

/// Rounded completion percentage for a non-empty video set.
pub fn progress_percentage(completed: usize, total_videos: u32) -> u32 {
    ((completed as f64 / total_videos as f64) * 100.0).round() as u32
}

/// Overwrite course attributes from the allow-list. Untouched fields keep
/// their stored values.
pub fn apply_updates(course: &mut Course, updates: CourseUpdates) {
    if let Some(v) = updates.course_name {
        course.course_name = v;
    }
    if let Some(v) = updates.course_description {
        course.course_description = v;
    }
    if let Some(v) = updates.what_you_will_learn {
        course.what_you_will_learn = v;
    }
    if let Some(v) = updates.price {
        course.price = v;
    }
    if let Some(v) = updates.tag {
        course.tag = v;
    }
    if let Some(v) = updates.instructions {
        course.instructions = v;
    }
    if let Some(v) = updates.category {
        course.category = v;
    }
    if let Some(v) = updates.status {
        course.status = v;
    }
}

/// Parse a structured field transported as JSON text (an array of strings).
/// Rejection happens before any course attribute is touched.
pub fn parse_string_array(field: &'static str, raw: &str) -> Result<Vec<String>, CourseError> {
    serde_json::from_str(raw).map_err(|_| CourseError::MalformedField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(seconds: &str) -> SubSection {
        SubSection {
            id: Uuid::new_v4(),
            title: "clip".to_string(),
            description: None,
            video_url: "https://cdn.studyhub.example/clip.mp4".to_string(),
            time_duration: Some(seconds.to_string()),
        }
    }

    fn section(subs: Vec<SubSection>) -> SectionView {
        SectionView {
            id: Uuid::new_v4(),
            section_name: "week".to_string(),
            sub_sections: subs,
        }
    }

    fn draft_course() -> Course {
        let now = Utc::now();
        Course {
            id: Uuid::new_v4(),
            course_name: "Rust 101".to_string(),
            course_description: "Intro".to_string(),
            instructor: Uuid::new_v4(),
            what_you_will_learn: "Ownership".to_string(),
            price: Decimal::new(10, 0),
            tag: vec!["rust".to_string()],
            category: Uuid::new_v4(),
            instructions: vec![],
            status: "Draft".to_string(),
            course_content: vec![],
            students_enrolled: vec![],
            ratings_and_reviews: vec![],
            thumbnail: "https://cdn.studyhub.example/thumb.png".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn order_by_reference_restores_display_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let items = vec![(c, "c"), (a, "a"), (b, "b")];
        let ordered = order_by_reference(&[a, b, c], items, |item| item.0);
        assert_eq!(ordered.iter().map(|i| i.1).collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn order_by_reference_skips_missing_and_drops_unlisted() {
        let a = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let unlisted = Uuid::new_v4();
        let items = vec![(a, "a"), (unlisted, "x")];
        let ordered = order_by_reference(&[missing, a], items, |item| item.0);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].1, "a");
    }

    #[test]
    fn total_duration_sums_across_sections() {
        let content = vec![
            section(vec![sub("300"), sub("60")]),
            section(vec![sub("240"), sub("garbage"), sub("")]),
        ];
        assert_eq!(total_duration_seconds(&content), 600);
    }

    #[test]
    fn total_duration_is_order_independent() {
        let s1 = section(vec![sub("120"), sub("45")]);
        let s2 = section(vec![sub("600")]);
        let forward = vec![s1.clone(), s2.clone()];
        let backward = vec![s2, s1];
        assert_eq!(total_duration_seconds(&forward), total_duration_seconds(&backward));
    }

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        assert_eq!(progress_percentage(3, 10), 30);
        assert_eq!(progress_percentage(1, 3), 33);
        assert_eq!(progress_percentage(2, 3), 67);
        assert_eq!(progress_percentage(0, 5), 0);
        assert_eq!(progress_percentage(5, 5), 100);
    }

    #[test]
    fn apply_updates_touches_only_supplied_fields() {
        let mut course = draft_course();
        let original_description = course.course_description.clone();

        apply_updates(
            &mut course,
            CourseUpdates {
                course_name: Some("Rust 201".to_string()),
                price: Some(Decimal::new(25, 0)),
                ..Default::default()
            },
        );

        assert_eq!(course.course_name, "Rust 201");
        assert_eq!(course.price, Decimal::new(25, 0));
        assert_eq!(course.course_description, original_description);
    }

    #[test]
    fn structured_fields_round_trip_and_reject_malformed_text() {
        let tags = parse_string_array("tag", r#"["rust","backend"]"#).unwrap();
        assert_eq!(tags, vec!["rust".to_string(), "backend".to_string()]);

        let mut course = draft_course();
        apply_updates(
            &mut course,
            CourseUpdates {
                tag: Some(tags.clone()),
                ..Default::default()
            },
        );
        assert_eq!(course.tag, tags);

        let err = parse_string_array("tag", "not json").unwrap_err();
        assert_eq!(err.to_string(), "Invalid JSON in field 'tag'");
    }
}
