use rand::Rng;

/// One of the six fixed advice topics shown on the selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const CATEGORIES: [Category; 6] = [
    Category {
        id: "career",
        name: "Career",
        icon: "💼",
        description: "Job, career planning, professional development",
    },
    Category {
        id: "finance",
        name: "Finance",
        icon: "💰",
        description: "Budgeting, investing, financial planning",
    },
    Category {
        id: "health",
        name: "Health",
        icon: "🏥",
        description: "Wellness, fitness, mental health",
    },
    Category {
        id: "relationships",
        name: "Relationships",
        icon: "💕",
        description: "Personal relationships, communication",
    },
    Category {
        id: "education",
        name: "Education",
        icon: "📚",
        description: "Learning, skill development, courses",
    },
    Category {
        id: "lifestyle",
        name: "Lifestyle",
        icon: "🌟",
        description: "Hobbies, habits, life balance",
    },
];

/// Pool used when an id doesn't match any category.
pub const FALLBACK_CATEGORY: &str = "lifestyle";

const CAVEAT: &str = "Remember, this is general guidance. Your specific situation may require \
personalized consideration. Feel free to ask follow-up questions for more specific advice!";

pub fn find_category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Immutable mapping from category id to its candidate advice strings.
pub struct AdviceCatalog {
    pools: Vec<(&'static str, Vec<&'static str>)>,
}

impl Default for AdviceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AdviceCatalog {
    pub fn new() -> Self {
        let pools = vec![
            ("career", vec![
                "Focus on building skills that are in demand. Consider what industries are growing and align your development accordingly.",
                "Networking is crucial. Attend industry events, join professional groups, and maintain meaningful connections.",
                "Document your achievements regularly. Keep a success journal for performance reviews and interviews.",
                "Consider seeking a mentor in your field. Their guidance can accelerate your career growth significantly.",
                "Work-life balance matters. A sustainable pace will lead to better long-term career success.",
            ]),
            ("finance", vec![
                "Start with an emergency fund covering 3-6 months of expenses before investing aggressively.",
                "Follow the 50/30/20 rule: 50% needs, 30% wants, 20% savings and debt repayment.",
                "Diversify your investments across different asset classes to manage risk effectively.",
                "Track your expenses for at least a month to understand where your money goes.",
                "Invest in yourself first - education and skills often provide the best returns.",
            ]),
            ("health", vec![
                "Consistency beats intensity. Regular moderate exercise is better than sporadic intense workouts.",
                "Sleep is foundational. Aim for 7-9 hours and maintain a consistent sleep schedule.",
                "Hydration matters more than people think. Start your day with water before coffee.",
                "Mental health is as important as physical health. Consider mindfulness or meditation practices.",
                "Small daily habits compound over time. Focus on sustainable changes rather than drastic overhauls.",
            ]),
            ("relationships", vec![
                "Active listening is more important than having the perfect response. Show genuine interest.",
                "Set healthy boundaries. It's okay to say no and prioritize your well-being.",
                "Express appreciation regularly. Small acknowledgments strengthen relationships over time.",
                "Address conflicts early and directly rather than letting them fester.",
                "Invest time in relationships that energize you and add value to your life.",
            ]),
            ("education", vec![
                "Learn by doing. Apply concepts through projects rather than just consuming information.",
                "Spaced repetition is more effective than cramming. Review material at increasing intervals.",
                "Teach others what you learn. Explaining concepts solidifies your understanding.",
                "Focus on fundamentals before advanced topics. Strong foundations make everything easier.",
                "Set specific learning goals with measurable outcomes to track your progress.",
            ]),
            ("lifestyle", vec![
                "Build routines that support your goals. Willpower is finite, but habits are automatic.",
                "Practice gratitude daily. It shifts perspective and improves overall well-being.",
                "Limit decision fatigue by automating recurring choices (meals, outfits, etc.).",
                "Schedule downtime intentionally. Rest and recovery are productive activities.",
                "Regularly reassess your priorities. What matters most should guide your time allocation.",
            ]),
        ];

        Self { pools }
    }

    /// Resolves an id to a known pool, falling back to the lifestyle pool for
    /// unknown ids. Never fails.
    fn resolve(&self, category_id: &str) -> (&'static str, &[&'static str]) {
        self.pools
            .iter()
            .find(|(id, _)| *id == category_id)
            .or_else(|| self.pools.iter().find(|(id, _)| *id == FALLBACK_CATEGORY))
            .map(|(id, pool)| (*id, pool.as_slice()))
            .unwrap_or(("", &[]))
    }

    /// Draws one advice entry uniformly at random from the category's pool.
    /// The same entry may recur across calls.
    pub fn sample<R: Rng>(&self, category_id: &str, rng: &mut R) -> &'static str {
        let (_, pool) = self.resolve(category_id);
        pool[rng.gen_range(0..pool.len())]
    }

    /// Builds the full advisor reply: header naming the resolved category, the
    /// sampled advice, and the closing caveat.
    pub fn respond<R: Rng>(&self, category_id: &str, rng: &mut R) -> String {
        let (resolved, pool) = self.resolve(category_id);
        let advice = pool[rng.gen_range(0..pool.len())];
        format!(
            "Based on your {} question, here's my advice:\n\n{}\n\n{}",
            resolved, advice, CAVEAT
        )
    }
}

/// Assistant greeting shown when a category is selected.
pub fn greeting(category: &Category) -> String {
    format!(
        "Hello! I'm your {} advisor. I'm here to help with {}. What would you like to discuss?",
        category.name,
        category.description.to_lowercase()
    )
}
