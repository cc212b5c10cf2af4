use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePlan {
    pub course_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl CoursePlan {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Finds a lesson by title, returning it with its module.
    pub fn find_lesson(&self, title: &str) -> Option<(&CourseModule, &Lesson)> {
        self.modules.iter().find_map(|module| {
            module
                .lessons
                .iter()
                .find(|lesson| lesson.title == title)
                .map(|lesson| (module, lesson))
        })
    }
}
