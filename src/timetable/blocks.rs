//! Expansion of a curriculum into placement units.

use crate::db::Subject;

/// One required weekly hour of a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub subject_id: i64,
    pub subject_name: String,
    pub teacher_id: Option<i64>,
}

impl Block {
    pub fn for_subject(subject: &Subject) -> Self {
        Self {
            subject_id: subject.id,
            subject_name: subject.name.clone(),
            teacher_id: subject.teacher_id,
        }
    }
}

/// One block per unit of `hours_weekly`, subjects in input order.
pub fn expand_blocks(subjects: &[Subject]) -> Vec<Block> {
    subjects
        .iter()
        .flat_map(|subject| {
            std::iter::repeat_with(|| Block::for_subject(subject)).take(subject.hours_weekly as usize)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: i64, name: &str, teacher_id: Option<i64>, hours_weekly: u32) -> Subject {
        Subject {
            id,
            class_id: 1,
            name: name.to_string(),
            teacher_id,
            hours_weekly,
        }
    }

    #[test]
    fn test_one_block_per_hour() {
        let subjects = vec![subject(1, "Math", Some(10), 3), subject(2, "Art", None, 1)];
        let blocks = expand_blocks(&subjects);

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks.iter().filter(|b| b.subject_name == "Math").count(), 3);
        assert!(blocks
            .iter()
            .filter(|b| b.subject_id == 1)
            .all(|b| b.teacher_id == Some(10)));
        assert_eq!(blocks[3].teacher_id, None);
    }

    #[test]
    fn test_no_subjects_no_blocks() {
        assert!(expand_blocks(&[]).is_empty());
    }
}
