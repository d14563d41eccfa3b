//! Offline Backup Generator
//!
//! Deterministic, template-based outputs used when every provider failed.
//! Every function here is pure and total: any input yields a well-formed
//! output that passes the same checks a live completion must pass.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::ai::prompt::leap_of_faith::{Cps, MISSING_ASSUMPTIONS, upstream_assumptions};
use crate::ai::prompt::mom_test::MomTestContext;
use crate::ai::prompt::sanitize::{sanitize, segment};
use crate::ai::prompt::ImageRequest;
use crate::constants::offline::SEGMENT_WORDS;
use crate::types::{
    Assumptions, CircleType, LeapOfFaithInputs, MomTestInputs, MomTestQuestion, MomTestSheet,
    ProviderImage,
};

// =============================================================================
// Leap of Faith
// =============================================================================

/// Backup for either circle of the Leap of Faith builder
pub fn leap_of_faith(inputs: &LeapOfFaithInputs) -> Assumptions {
    match inputs.circle_type {
        CircleType::Assumption => assumptions(inputs),
        CircleType::Hypothesis => hypotheses(inputs),
    }
}

/// Exactly three assumptions spliced from the CPS statement
pub fn assumptions(inputs: &LeapOfFaithInputs) -> Assumptions {
    let cps = Cps::from_inputs(inputs);
    let customer = segment(&cps.customer, SEGMENT_WORDS);
    let problem = segment(&cps.problem, SEGMENT_WORDS);
    let solution = segment(&cps.solution, SEGMENT_WORDS);

    Assumptions {
        assumptions: vec![
            format!(
                "[LOFA #1]: {} experience \"{}\" often enough to actively look for a fix.",
                customer, problem
            ),
            format!(
                "[LOFA #2]: {} are willing to change their current habits or pay to adopt \"{}\".",
                customer, solution
            ),
            format!(
                "[LOFA #3]: \"{}\" solves \"{}\" better than the alternatives {} already use.",
                solution, problem, customer
            ),
        ],
    }
}

/// One hypothesis per upstream assumption
pub fn hypotheses(inputs: &LeapOfFaithInputs) -> Assumptions {
    let lofas = upstream_assumptions(inputs);
    if lofas.is_empty() {
        return Assumptions {
            assumptions: vec![MISSING_ASSUMPTIONS.to_string()],
        };
    }

    let cps = Cps::from_inputs(inputs);
    let customer = segment(&cps.customer, SEGMENT_WORDS);
    let problem = segment(&cps.problem, SEGMENT_WORDS);
    let solution = segment(&cps.solution, SEGMENT_WORDS);

    let behaviors = [
        format!("actively search for a way to deal with \"{}\"", problem),
        format!("try \"{}\" within their first week of hearing about it", solution),
        format!("keep using \"{}\" instead of their current workaround", solution),
    ];
    let reasons = [
        "they face this problem regularly and current alternatives are insufficient",
        "the cost of the problem is higher than the cost of switching",
        "it fits the way they already work",
    ];

    let assumptions = lofas
        .iter()
        .enumerate()
        .map(|(i, _)| {
            format!(
                "Hypothesis {n} (from LOFA {n}): We believe that {} will {} because {}.",
                customer,
                behaviors[i % behaviors.len()],
                reasons[i % reasons.len()],
                n = i + 1
            )
        })
        .collect();

    Assumptions { assumptions }
}

// =============================================================================
// Mom-Test
// =============================================================================

/// Question template: text with `{aud}`, default tag, rationale, signal, priority
struct QuestionTemplate {
    q: &'static str,
    tag: &'static str,
    why: &'static str,
    signal: &'static str,
    priority: u8,
}

const QUESTION_TEMPLATES: [QuestionTemplate; 10] = [
    QuestionTemplate {
        q: "Tell me about the last time {aud} ran into this problem.",
        tag: "Demand",
        why: "Anchors on a real past event instead of opinions.",
        signal: "A specific, recent story with concrete details.",
        priority: 1,
    },
    QuestionTemplate {
        q: "Walk me through how {aud} handle this today, step by step.",
        tag: "Value",
        why: "Reveals the current workflow without pitching anything.",
        signal: "Workarounds, spreadsheets or manual steps they already tolerate.",
        priority: 1,
    },
    QuestionTemplate {
        q: "How many times did this come up for {aud} in the past month?",
        tag: "Demand",
        why: "Frequency and recency separate real pain from mild annoyance.",
        signal: "A concrete count and a recent date.",
        priority: 1,
    },
    QuestionTemplate {
        q: "How much time did the last occurrence cost {aud}?",
        tag: "Value",
        why: "Measures the cost of the problem in past terms.",
        signal: "Hours or days lost, stated without hesitation.",
        priority: 2,
    },
    QuestionTemplate {
        q: "What have {aud} already spent trying to solve this?",
        tag: "Monetization",
        why: "Past spend is evidence; hypothetical willingness to pay is not.",
        signal: "Money or budget already allocated to tools or services.",
        priority: 1,
    },
    QuestionTemplate {
        q: "Where did {aud} last look for help with this?",
        tag: "Acquisition",
        why: "Shows the channels customers actually use.",
        signal: "Named communities, searches, vendors or referrals.",
        priority: 2,
    },
    QuestionTemplate {
        q: "Who else was involved the last time {aud} picked a tool for this?",
        tag: "Monetization",
        why: "Maps the real decision process and stakeholders.",
        signal: "Named approvers, budget owners or influencers.",
        priority: 2,
    },
    QuestionTemplate {
        q: "What would {aud} have to give up to change how this is done?",
        tag: "Retention",
        why: "Surfaces switching costs without asking about the future.",
        signal: "Sunk investments, contracts or habits that are hard to drop.",
        priority: 3,
    },
    QuestionTemplate {
        q: "What happened the last time this went wrong for {aud}?",
        tag: "Value",
        why: "Consequences reveal how high the problem ranks.",
        signal: "Lost clients, revenue or reputation, described vividly.",
        priority: 2,
    },
    QuestionTemplate {
        q: "What finally pushed {aud} to look for something new last time?",
        tag: "Growth",
        why: "Identifies the purchase trigger from past behavior.",
        signal: "A clear triggering event and its timing.",
        priority: 3,
    },
];

/// Ten hand-authored questions referencing the audience
pub fn mom_test(inputs: &MomTestInputs) -> MomTestSheet {
    let ctx = MomTestContext::from_inputs(inputs);
    let audience = segment(&ctx.audience, SEGMENT_WORDS);
    let requested_tag = ctx.known_tag();

    let questions = QUESTION_TEMPLATES
        .iter()
        .map(|t| MomTestQuestion {
            q: t.q.replace("{aud}", &audience),
            assumption_tag: requested_tag.unwrap_or(t.tag).to_string(),
            why_it_works: t.why.to_string(),
            signal_to_listen_for: t.signal.to_string(),
            priority: t.priority,
        })
        .collect();

    MomTestSheet {
        assumption_category: ctx.assumption_category,
        hypothesis: sanitize(&inputs.hypothesis),
        audience: ctx.audience,
        questions,
    }
}

// =============================================================================
// Images
// =============================================================================

/// One SVG placeholder per requested seed, sized to the requested aspect
pub fn images(request: &ImageRequest) -> Vec<ProviderImage> {
    let label = xml_escape(&segment(&request.subject, 6));
    request
        .seeds
        .iter()
        .map(|&seed| {
            let svg = placeholder_svg(request.width, request.height, seed, &label);
            ProviderImage {
                data_url: format!("data:image/svg+xml;base64,{}", BASE64.encode(svg)),
                seed,
            }
        })
        .collect()
}

fn placeholder_svg(width: u32, height: u32, seed: u32, label: &str) -> String {
    let hue = seed % 360;
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<rect width="100%" height="100%" fill="hsl({hue},35%,88%)"/>"#,
            r#"<text x="50%" y="48%" text-anchor="middle" font-family="sans-serif" font-size="{fs}" fill="hsl({hue},40%,25%)">{label}</text>"#,
            r#"<text x="50%" y="56%" text-anchor="middle" font-family="sans-serif" font-size="{small}" fill="hsl({hue},20%,40%)">concept preview · seed {seed}</text>"#,
            "</svg>"
        ),
        w = width,
        h = height,
        hue = hue,
        fs = width / 24,
        small = width / 48,
        label = label,
        seed = seed,
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
