//! Leap of Faith Assumption and hypothesis prompts.

use super::sanitize::{or_default, sanitize};
use super::{PromptBuilder, PromptPair};
use crate::constants::llm::DEFAULT_MAX_TOKENS;
use crate::types::{BizError, CircleType, LeapOfFaithInputs, Result};

pub const DEFAULT_CUSTOMER: &str = "the target customer";
pub const DEFAULT_PROBLEM: &str = "the problem they face";
pub const DEFAULT_SOLUTION: &str = "the proposed solution";

/// Message returned when hypotheses are requested without upstream assumptions
pub const MISSING_ASSUMPTIONS: &str =
    "Please generate Leap of Faith Assumptions first before creating hypotheses.";

/// Sanitized Customer-Problem-Solution statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cps {
    pub customer: String,
    pub problem: String,
    pub solution: String,
}

impl Cps {
    pub fn from_inputs(inputs: &LeapOfFaithInputs) -> Self {
        Self {
            customer: or_default(&inputs.customer, DEFAULT_CUSTOMER),
            problem: or_default(&inputs.problem, DEFAULT_PROBLEM),
            solution: or_default(&inputs.solution, DEFAULT_SOLUTION),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Customer", self.customer.clone()),
            ("Problem", self.problem.clone()),
            ("Solution", self.solution.clone()),
        ]
    }
}

/// Upstream assumptions after sanitization, blanks dropped
pub fn upstream_assumptions(inputs: &LeapOfFaithInputs) -> Vec<String> {
    inputs
        .leap_of_faith_results
        .iter()
        .map(|s| sanitize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Build the prompt for the circle named in `inputs`.
///
/// The hypothesis circle fails with `UpstreamInputMissing` when no
/// assumptions survive sanitization.
pub fn build(inputs: &LeapOfFaithInputs) -> Result<PromptPair> {
    let cps = Cps::from_inputs(inputs);
    match inputs.circle_type {
        CircleType::Assumption => Ok(assumptions_prompt(&cps)),
        CircleType::Hypothesis => {
            let lofas = upstream_assumptions(inputs);
            if lofas.is_empty() {
                return Err(BizError::UpstreamInputMissing(MISSING_ASSUMPTIONS.to_string()));
            }
            Ok(hypotheses_prompt(&cps, &lofas))
        }
    }
}

fn assumptions_prompt(cps: &Cps) -> PromptPair {
    let system = PromptBuilder::new()
        .role(
            "Lean Startup Strategist",
            "Identify the most critical Leap of Faith Assumptions (LOFAs) behind a founder's \
             Customer-Problem-Solution statement, focusing on those that would sink the business \
             if proven false.",
        )
        .text(
            "You are an expert in hypothesis-driven entrepreneurship and Eric Ries' Lean Startup \
             methodology. You help early-stage founders turn abstract ideas into clear, \
             falsifiable leaps of faith that can be validated through customer discovery.",
        )
        .steps(&[
            "Parse the CPS input: who the customer is, what problem they have, what solution is proposed",
            "Determine the implicit assumptions the founder is making for the solution to work",
            "Pick the riskiest beliefs that must be true for the idea to survive",
            "Phrase 2-3 of them as falsifiable beliefs about customer behavior, willingness to pay, problem relevance or solution effectiveness",
        ])
        .section(
            "Expected Output (one per line, nothing else):",
            "[LOFA #1]: [assumption]\n[LOFA #2]: [assumption]\n[LOFA #3]: [assumption]",
        )
        .build();

    let user = PromptBuilder::new()
        .fields("Based on this CPS statement:", cps.fields())
        .text(
            "Generate 2-3 Leap of Faith Assumptions using the exact format above. Focus on \
             assumptions that, if proven wrong, would significantly jeopardize the viability of \
             the idea.",
        )
        .build();

    PromptPair::new(system, user, DEFAULT_MAX_TOKENS)
}

fn hypotheses_prompt(cps: &Cps, lofas: &[String]) -> PromptPair {
    let system = PromptBuilder::new()
        .role(
            "Hypothesis Framer for Startup Validation",
            "Turn each Leap of Faith Assumption into a specific, falsifiable hypothesis that can \
             guide customer discovery interviews and experiments.",
        )
        .text("You do not interview users. You only write structured hypotheses.")
        .steps(&[
            "Read each Leap of Faith Assumption carefully",
            "Ask what the world would look like if it were true and how real user behavior could test it",
            "Rewrite it as: We believe that [customer segment] will [specific behavior] because [reason or pain point]",
        ])
        .section(
            "Expected Output Format (one per line, nothing else):",
            "Hypothesis 1 (from LOFA 1): We believe that [segment] will [behavior] because [reason].\n\
             Hypothesis 2 (from LOFA 2): We believe that [segment] will [behavior] because [reason].\n\
             Hypothesis 3 (from LOFA 3): We believe that [segment] will [behavior] because [reason].",
        )
        .build();

    let user = PromptBuilder::new()
        .section("Based on these Leap of Faith Assumptions:", &lofas.join("\n"))
        .fields("And this CPS context:", cps.fields())
        .text(
            "Convert each Leap of Faith Assumption into a testable hypothesis using the exact \
             format above. Make each one falsifiable through real-world interaction.",
        )
        .build();

    PromptPair::new(system, user, DEFAULT_MAX_TOKENS)
}
