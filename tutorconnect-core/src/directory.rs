//! Tutor directory: the seed catalogue and the dashboard search/subject filter.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{PresenceStatus, Tutor};

struct Seed {
    id: &'static str,
    name: &'static str,
    avatar: &'static str,
    subjects: &'static [&'static str],
    rating: f32,
    rate_per_minute: f64,
    status: PresenceStatus,
    total_students: u32,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Dr. Sarah Johnson",
        avatar: "https://images.unsplash.com/photo-1494790108755-2616b612b47c?w=100&h=100&fit=crop&crop=face",
        subjects: &["Mathematics", "Physics", "Chemistry"],
        rating: 4.9,
        rate_per_minute: 25.0,
        status: PresenceStatus::Online,
        total_students: 342,
    },
    Seed {
        id: "2",
        name: "Prof. Michael Chen",
        avatar: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=100&h=100&fit=crop&crop=face",
        subjects: &["Computer Science", "Programming", "Data Structures"],
        rating: 4.8,
        rate_per_minute: 30.0,
        status: PresenceStatus::Busy,
        total_students: 289,
    },
    Seed {
        id: "3",
        name: "Ms. Emily Rodriguez",
        avatar: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=100&h=100&fit=crop&crop=face",
        subjects: &["English Literature", "Creative Writing", "Grammar"],
        rating: 4.7,
        rate_per_minute: 20.0,
        status: PresenceStatus::Online,
        total_students: 156,
    },
    Seed {
        id: "4",
        name: "Dr. Ahmed Hassan",
        avatar: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=100&h=100&fit=crop&crop=face",
        subjects: &["Biology", "Biochemistry", "Organic Chemistry"],
        rating: 4.9,
        rate_per_minute: 28.0,
        status: PresenceStatus::Offline,
        total_students: 201,
    },
    Seed {
        id: "5",
        name: "Prof. Lisa Thompson",
        avatar: "https://images.unsplash.com/photo-1489424731084-a5d8b219a5bb?w=100&h=100&fit=crop&crop=face",
        subjects: &["History", "Political Science", "Geography"],
        rating: 4.6,
        rate_per_minute: 22.0,
        status: PresenceStatus::Online,
        total_students: 178,
    },
    Seed {
        id: "6",
        name: "Dr. James Wilson",
        avatar: "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=100&h=100&fit=crop&crop=face",
        subjects: &["Economics", "Finance", "Statistics"],
        rating: 4.8,
        rate_per_minute: 26.0,
        status: PresenceStatus::Busy,
        total_students: 234,
    },
];

/// The static catalogue the dashboard starts from.
pub fn seed_tutors() -> Vec<Tutor> {
    SEEDS
        .iter()
        .map(|s| Tutor {
            id: s.id.to_string(),
            name: s.name.to_string(),
            avatar: Some(s.avatar.to_string()),
            subjects: s.subjects.iter().map(|sub| sub.to_string()).collect(),
            rating: s.rating.clamp(0.0, 5.0),
            rate_per_minute: s.rate_per_minute,
            status: s.status,
            total_students: s.total_students,
        })
        .collect()
}

/// Tutors whose name or subjects contain `query` (case-insensitive) and, when
/// a subject is selected, who teach exactly that subject. Directory order is
/// preserved.
pub fn filter_tutors<'a>(tutors: &'a [Tutor], query: &str, subject: Option<&str>) -> Vec<&'a Tutor> {
    let subject = subject.filter(|s| !s.is_empty());
    tutors
        .iter()
        .filter(|t| t.matches_query(query))
        .filter(|t| subject.map_or(true, |s| t.teaches(s)))
        .collect()
}

/// Every distinct subject across the directory, sorted.
pub fn all_subjects(tutors: &[Tutor]) -> Vec<String> {
    tutors
        .iter()
        .flat_map(|t| t.subjects.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn quick_filters(tutors: &[Tutor], limit: usize) -> Vec<String> {
    let mut subjects = all_subjects(tutors);
    subjects.truncate(limit);
    subjects
}

/// Headline counts shown beside the directory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectoryStats {
    pub total: usize,
    pub online: usize,
    pub busy: usize,
    /// Mean per-minute rate rounded to a whole amount; 0 for an empty directory.
    pub avg_rate: f64,
}

pub fn stats(tutors: &[Tutor]) -> DirectoryStats {
    let count = |status: PresenceStatus| tutors.iter().filter(|t| t.status == status).count();
    let avg_rate = if tutors.is_empty() {
        0.0
    } else {
        let sum: f64 = tutors.iter().map(|t| t.rate_per_minute).sum();
        (sum / tutors.len() as f64).round()
    };
    DirectoryStats {
        total: tutors.len(),
        online: count(PresenceStatus::Online),
        busy: count(PresenceStatus::Busy),
        avg_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(tutors: &[&'a Tutor]) -> Vec<&'a str> {
        tutors.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_seed_catalogue_is_well_formed() {
        let tutors = seed_tutors();
        assert_eq!(tutors.len(), 6);
        for t in &tutors {
            assert!((0.0..=5.0).contains(&t.rating), "{} rating out of range", t.name);
            assert!(t.rate_per_minute > 0.0, "{} rate must be positive", t.name);
            assert!(!t.subjects.is_empty());
        }
    }

    #[test]
    fn test_search_by_surname() {
        let tutors = seed_tutors();
        let hits = filter_tutors(&tutors, "chen", None);
        assert_eq!(names(&hits), vec!["Prof. Michael Chen"]);
    }

    #[test]
    fn test_search_by_subject_fragment() {
        let tutors = seed_tutors();
        let hits = filter_tutors(&tutors, "math", None);
        assert_eq!(names(&hits), vec!["Dr. Sarah Johnson"]);
    }

    #[test]
    fn test_empty_query_keeps_order() {
        let tutors = seed_tutors();
        let hits = filter_tutors(&tutors, "", None);
        let ids: Vec<&str> = hits.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_subject_filter_is_exact() {
        let tutors = seed_tutors();
        // "Chemistry" must not pull in "Organic Chemistry"/"Biochemistry" teachers
        let hits = filter_tutors(&tutors, "", Some("Chemistry"));
        assert_eq!(names(&hits), vec!["Dr. Sarah Johnson"]);

        let none = filter_tutors(&tutors, "chen", Some("Chemistry"));
        assert!(none.is_empty());
    }

    #[test]
    fn test_empty_subject_means_all() {
        let tutors = seed_tutors();
        assert_eq!(filter_tutors(&tutors, "", Some("")).len(), tutors.len());
    }

    #[test]
    fn test_filter_partitions_directory() {
        let tutors = seed_tutors();
        for (query, subject) in [("science", None), ("dr", Some("Biology")), ("zzz", None), ("CHEM", None)] {
            let hits = filter_tutors(&tutors, query, subject);
            for t in &tutors {
                let expected = t.matches_query(query) && subject.map_or(true, |s| t.teaches(s));
                let included = hits.iter().any(|h| h.id == t.id);
                assert_eq!(expected, included, "query={query:?} subject={subject:?} tutor={}", t.name);
            }
        }
    }

    #[test]
    fn test_subjects_sorted_and_truncated() {
        let tutors = seed_tutors();
        let all = all_subjects(&tutors);
        assert_eq!(all.len(), 18);
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);

        let quick = quick_filters(&tutors, 8);
        assert_eq!(quick.len(), 8);
        assert_eq!(quick[0], "Biochemistry");
    }

    #[test]
    fn test_stats_for_seeded_directory() {
        let tutors = seed_tutors();
        let stats = stats(&tutors);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.online, 3);
        assert_eq!(stats.busy, 2);
        // 151 / 6 = 25.17
        assert_eq!(stats.avg_rate, 25.0);
    }

    #[test]
    fn test_stats_track_presence_and_empty_directory() {
        let mut tutors = seed_tutors();
        for t in tutors.iter_mut() {
            t.status = PresenceStatus::Busy;
        }
        let busy = stats(&tutors);
        assert_eq!((busy.online, busy.busy), (0, 6));

        let empty = stats(&[]);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.avg_rate, 0.0);
    }
}
