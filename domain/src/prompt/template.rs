//! Prompt templates for council agents

use crate::agent::AgentRole;
use crate::case::CaseContext;
use crate::core::question::Question;

/// Reply contract appended to every system prompt
const REPLY_CONTRACT: &str = r#"You MUST respond in valid JSON with this structure:
{
  "vote": "YES" or "NO",
  "confidence": 0.0-1.0 (as a decimal),
  "reasoning": "Your analysis explaining the conclusion",
  "citations": ["Standards, policies or facts that support your analysis"],
  "recommendations": ["Concrete next steps for the investigator"]
}
If you cannot reach a judgment, answer with "vote": "ABSTAIN" and explain why in "reasoning"."#;

/// Templates for generating per-role prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt for an agent holding `role`
    pub fn system_prompt(name: &str, role: AgentRole) -> String {
        format!(
            "You are {name}, {persona}\n\n{focus}\n\n{contract}\n\n{tone}",
            persona = Self::persona(role),
            focus = Self::focus(role),
            contract = REPLY_CONTRACT,
            tone = Self::tone(role),
        )
    }

    /// User prompt carrying the question and the case facts relevant to `role`
    pub fn user_prompt(role: AgentRole, case: &CaseContext, question: &Question) -> String {
        let mut prompt = format!("QUESTION: {}\n\nCASE DATA:\n", question.content());

        let unknown = "Unknown";
        let case_label = if case.case_number.is_empty() {
            case.id.as_str()
        } else {
            case.case_number.as_str()
        };
        prompt.push_str(&format!("- Case: {}\n", case_label));
        prompt.push_str(&format!("- Category: {}\n", or_default(&case.category, unknown)));
        prompt.push_str(&format!(
            "- Description: {}\n",
            or_default(&case.description, "No description provided")
        ));

        match role {
            AgentRole::LegalCompliance => {
                push_incident(&mut prompt, case);
                prompt.push_str(&format!(
                    "- Location: {}\n",
                    case.incident_location.as_deref().unwrap_or("Not specified")
                ));
                prompt.push_str(&format!("- Is Ongoing: {}\n", case.is_ongoing));
            }
            AgentRole::TraumaInformedAnalysis => {
                push_incident(&mut prompt, case);
                prompt.push_str(&format!("- Is Ongoing: {}\n", case.is_ongoing));
                prompt.push_str(&format!("- Crisis Flag: {}\n", case.is_crisis));
            }
            AgentRole::BiasDetection => {}
            AgentRole::EvidenceAnalysis => {
                push_incident(&mut prompt, case);
                prompt.push_str(&format!("- Evidence Count: {}\n", case.evidence_summary.len()));
                prompt.push_str("\nAVAILABLE EVIDENCE:\n");
                if case.evidence_summary.is_empty() {
                    prompt.push_str("No evidence details provided\n");
                }
                for item in &case.evidence_summary {
                    prompt.push_str(&format!("- {}\n", item));
                }
            }
            AgentRole::RiskAssessment => {
                prompt.push_str(&format!("- Is Ongoing: {}\n", case.is_ongoing));
                prompt.push_str(&format!("- Crisis Flag: {}\n", case.is_crisis));
            }
        }

        prompt.push_str(&format!(
            "\nAnalyze this case {} and respond in the JSON format specified in your system prompt.",
            Self::perspective(role)
        ));
        prompt
    }

    fn persona(role: AgentRole) -> &'static str {
        match role {
            AgentRole::LegalCompliance => "a Title IX legal compliance expert.",
            AgentRole::TraumaInformedAnalysis => "a trauma-informed advocate and psychologist.",
            AgentRole::BiasDetection => "a bias detection and fairness expert.",
            AgentRole::EvidenceAnalysis => "an evidence analysis and investigation expert.",
            AgentRole::RiskAssessment => "a risk assessment and campus safety expert.",
        }
    }

    fn focus(role: AgentRole) -> &'static str {
        match role {
            AgentRole::LegalCompliance => {
                r#"You have deep knowledge of:
- Title IX of the Education Amendments Act of 1972 (20 U.S.C. 1681)
- Clery Act requirements
- The 2020 Title IX regulations
- Supreme Court precedents (Davis v. Monroe, Gebser v. Lago Vista)

Your role is to analyze whether incidents meet legal standards for Title IX jurisdiction.
List any timeline or process requirements among your recommendations."#
            }
            AgentRole::TraumaInformedAnalysis => {
                r#"You understand:
- Trauma responses and neurobiology
- Why victims may have fragmented memories or delayed disclosure
- Power dynamics and coercion in educational settings
- Cultural considerations in disclosure

Your role is to assess psychological impact and ensure the process is trauma-informed.
Include observed trauma indicators and needed accommodations among your recommendations."#
            }
            AgentRole::BiasDetection => {
                r#"Your focus is:
- Identifying language bias in reports and investigations
- Detecting differential treatment based on protected characteristics
- Ensuring equal application of standards

Your role is to flag potential bias and ensure procedural fairness."#
            }
            AgentRole::EvidenceAnalysis => {
                r#"You specialize in:
- Fact extraction and timeline reconstruction
- Credibility assessment of statements
- Corroboration analysis and documentary evidence review
- Logical consistency checking

Your role is to evaluate the strength and reliability of the evidence."#
            }
            AgentRole::RiskAssessment => {
                r#"You analyze:
- Repeat-respondent and cross-case patterns
- Retaliation risk
- Ongoing safety concerns for the complainant and community
- Preventive intervention opportunities

Your role is to identify patterns and assess risk."#
            }
        }
    }

    fn tone(role: AgentRole) -> &'static str {
        match role {
            AgentRole::LegalCompliance => {
                "Be precise, cite specific legal standards, and maintain strict neutrality."
            }
            AgentRole::TraumaInformedAnalysis => {
                "Be empathetic but objective. Follow trauma-informed practice."
            }
            AgentRole::BiasDetection => "Be vigilant for bias but avoid false positives.",
            AgentRole::EvidenceAnalysis => "Focus on facts over interpretation.",
            AgentRole::RiskAssessment => "Weigh safety first and think about prevention.",
        }
    }

    fn perspective(role: AgentRole) -> &'static str {
        match role {
            AgentRole::LegalCompliance => "from a legal compliance perspective",
            AgentRole::TraumaInformedAnalysis => "from a trauma-informed perspective",
            AgentRole::BiasDetection => "for bias and fairness concerns",
            AgentRole::EvidenceAnalysis => "from an investigative perspective",
            AgentRole::RiskAssessment => "for risk and patterns",
        }
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() { default } else { value }
}

fn push_incident(prompt: &mut String, case: &CaseContext) {
    prompt.push_str(&format!(
        "- Incident Date: {}\n",
        case.incident_date.as_deref().unwrap_or("Unknown")
    ));
}
