use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

/// Static content of the landing screen.
#[derive(Debug, Clone, Serialize)]
pub struct LandingPage {
    pub product: &'static str,
    pub headline: &'static str,
    pub tagline: &'static str,
    pub features: Vec<Feature>,
    pub primary_action: &'static str,
    pub secondary_action: &'static str,
    pub closing_call: &'static str,
    /// Controls that exist on the page but do nothing yet.
    pub placeholders: Vec<&'static str>,
}

pub fn landing_page() -> LandingPage {
    LandingPage {
        product: "TutorConnect",
        headline: "Learn from Expert Tutors Worldwide",
        tagline: "Connect with qualified teachers for personalized learning sessions. \
                  Pay per minute, learn at your pace, achieve your goals.",
        features: vec![
            Feature {
                title: "Real-time Chat",
                description: "Instant messaging with your tutor for quick clarifications and discussions",
            },
            Feature {
                title: "Expert Tutors",
                description: "Verified teachers with proven track records and excellent ratings",
            },
            Feature {
                title: "Flexible Timing",
                description: "Learn at your own pace with pay-per-minute billing system",
            },
            Feature {
                title: "All Subjects",
                description: "From basic math to advanced programming - find tutors for any subject",
            },
        ],
        primary_action: "Find Your Tutor",
        secondary_action: "Get Started Today",
        closing_call: "Ready to Start Learning? Join thousands of students already learning with expert tutors",
        placeholders: vec!["Login", "Sign Up", "Become a Teacher"],
    }
}
