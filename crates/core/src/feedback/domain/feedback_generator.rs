/// Qualitative band a metric falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Top,
    Good,
    Fair,
    Low,
}

impl Tier {
    /// `thresholds` are the inclusive lower bounds of Top, Good and Fair.
    fn of(value: f64, thresholds: [f64; 3]) -> Self {
        if value >= thresholds[0] {
            Tier::Top
        } else if value >= thresholds[1] {
            Tier::Good
        } else if value >= thresholds[2] {
            Tier::Fair
        } else {
            Tier::Low
        }
    }
}

const VISIBILITY_TIERS: [f64; 3] = [90.0, 70.0, 50.0];
const EYE_CONTACT_TIERS: [f64; 3] = [80.0, 60.0, 40.0];
const STABILITY_TIERS: [f64; 3] = [80.0, 60.0, 40.0];

const VISIBILITY_SUGGESTION_BELOW: f64 = 70.0;
const EYE_CONTACT_SUGGESTION_BELOW: f64 = 60.0;
const STABILITY_SUGGESTION_BELOW: f64 = 60.0;

pub const VISIBILITY_SUGGESTION: &str = "Position yourself better in the camera frame";
pub const EYE_CONTACT_SUGGESTION: &str = "Practice maintaining eye contact with the camera";
pub const STABILITY_SUGGESTION: &str = "Work on staying more still and composed";
pub const AFFIRMATION: &str = "Great facial expressions! Keep up the excellent work";

pub fn visibility_tier(visibility: f64) -> Tier {
    Tier::of(visibility, VISIBILITY_TIERS)
}

pub fn eye_contact_tier(eye_contact: f64) -> Tier {
    Tier::of(eye_contact, EYE_CONTACT_TIERS)
}

pub fn stability_tier(stability: f64) -> Tier {
    Tier::of(stability, STABILITY_TIERS)
}

fn visibility_sentence(tier: Tier) -> &'static str {
    match tier {
        Tier::Top => "Excellent face visibility - you stayed well-positioned in the camera frame.",
        Tier::Good => "Good face visibility - you maintained good positioning most of the time.",
        Tier::Fair => "Fair face visibility - try to stay more centered in the camera view.",
        Tier::Low => {
            "Poor face visibility - ensure you're properly positioned in front of the camera."
        }
    }
}

fn eye_contact_sentence(tier: Tier) -> &'static str {
    match tier {
        Tier::Top => "Strong eye contact - you maintained excellent engagement with the camera.",
        Tier::Good => "Good eye contact - you showed consistent engagement.",
        Tier::Fair => "Fair eye contact - try to look at the camera more consistently.",
        Tier::Low => {
            "Weak eye contact - practice looking directly at the camera during interviews."
        }
    }
}

fn stability_sentence(tier: Tier) -> &'static str {
    match tier {
        Tier::Top => "Excellent facial stability - you remained composed and steady.",
        Tier::Good => "Good facial stability - you stayed relatively still.",
        Tier::Fair => "Fair facial stability - try to reduce unnecessary facial movements.",
        Tier::Low => {
            "Poor facial stability - work on staying more composed and reducing movement."
        }
    }
}

/// Text produced for one set of metrics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    /// One sentence per metric, space-joined: visibility, eye contact, stability.
    pub text: String,
    /// Never empty.
    pub suggestions: Vec<String>,
}

/// Maps the three percentage metrics to feedback sentences and suggestions.
pub fn generate(visibility: f64, eye_contact: f64, stability: f64) -> Feedback {
    let text = [
        visibility_sentence(visibility_tier(visibility)),
        eye_contact_sentence(eye_contact_tier(eye_contact)),
        stability_sentence(stability_tier(stability)),
    ]
    .join(" ");

    Feedback {
        text,
        suggestions: suggestions(visibility, eye_contact, stability),
    }
}

fn suggestions(visibility: f64, eye_contact: f64, stability: f64) -> Vec<String> {
    let mut out = Vec::new();
    if visibility < VISIBILITY_SUGGESTION_BELOW {
        out.push(VISIBILITY_SUGGESTION.to_string());
    }
    if eye_contact < EYE_CONTACT_SUGGESTION_BELOW {
        out.push(EYE_CONTACT_SUGGESTION.to_string());
    }
    if stability < STABILITY_SUGGESTION_BELOW {
        out.push(STABILITY_SUGGESTION.to_string());
    }
    if out.is_empty() {
        out.push(AFFIRMATION.to_string());
    }
    out
}
