use serde::{Deserialize, Serialize};

pub const MAX_GAP_QUESTIONS: usize = 3;
pub const MAX_COMPETENCY_QUESTIONS: usize = 2;

const BEHAVIOURAL_QUESTION: &str = "Describe a situation where you had to adapt to a significant change in project scope. How did you handle it?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Gap,
    Competency,
    Behavioural,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub kind: QuestionKind,
    /// Skill the question probes; `None` for the behavioural question.
    pub skill: Option<String>,
    pub text: String,
}

/// Up to three gap questions, up to two competency questions and one
/// behavioural question, in that order. Deterministic for the same input order.
pub fn interview_questions<'a, M, K>(missing: M, matched: K) -> Vec<InterviewQuestion>
where
    M: IntoIterator<Item = &'a String>,
    K: IntoIterator<Item = &'a String>,
{
    let gap = missing.into_iter().take(MAX_GAP_QUESTIONS).map(|skill| InterviewQuestion {
        kind: QuestionKind::Gap,
        skill: Some(skill.clone()),
        text: format!(
            "Your profile suggests limited exposure to {skill}. Can you share any related experience or how you would approach learning this quickly?"
        ),
    });
    let competency = matched
        .into_iter()
        .take(MAX_COMPETENCY_QUESTIONS)
        .map(|skill| InterviewQuestion {
            kind: QuestionKind::Competency,
            skill: Some(skill.clone()),
            text: format!(
                "Could you walk us through a specific project where you utilized {skill} to solve a complex problem?"
            ),
        });
    let behavioural = std::iter::once(InterviewQuestion {
        kind: QuestionKind::Behavioural,
        skill: None,
        text: BEHAVIOURAL_QUESTION.to_string(),
    });

    gap.chain(competency).chain(behavioural).collect()
}
