//! Console output formatter for council results

use crate::output::formatter::OutputFormatter;
use colored::{ColoredString, Colorize};
use council_domain::{AgentVerdict, AnalysisResult, BiasReport, Decision, OverallTone, Severity};

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete analysis
    pub fn format(result: &AnalysisResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Case Council Analysis"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.question
        ));

        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Decision:".cyan().bold(),
            Self::decision(result.decision),
            "Confidence:".cyan().bold(),
            Self::percent(result.confidence)
        ));
        output.push_str(&format!(
            "{} {} YES / {} NO ({} yes)  {}\n",
            "Votes:".cyan().bold(),
            result.yes_votes,
            result.no_votes,
            Self::percent(result.yes_percentage),
            result.vote_summary()
        ));
        if result.has_disagreement {
            output.push_str(&format!("{}\n", "Disagreement flagged".yellow().bold()));
        }

        output.push_str(&Self::section_header("Agent Breakdown"));
        for verdict in &result.agent_breakdown {
            match verdict {
                AgentVerdict::Responded(vote) => {
                    output.push_str(&format!(
                        "\n{} {} ({:.0}%)\n{}\n",
                        format!("── {} · {} ──", vote.agent_name, vote.agent_role.label())
                            .yellow()
                            .bold(),
                        Self::decision(vote.decision),
                        vote.confidence * 100.0,
                        Self::indent(&vote.reasoning, "  ")
                    ));
                    for citation in &vote.citations {
                        output.push_str(&format!("  {} {}\n", "§".dimmed(), citation));
                    }
                    for recommendation in &vote.recommendations {
                        output.push_str(&format!("  * {}\n", recommendation));
                    }
                }
                AgentVerdict::Abstained(abstention) => {
                    output.push_str(&format!(
                        "\n{} {}\n  {}\n",
                        format!(
                            "── {} · {} ──",
                            abstention.agent_name,
                            abstention.agent_role.label()
                        )
                        .red()
                        .bold(),
                        "ABSTAINED".red(),
                        abstention.abstain_reason
                    ));
                }
            }
        }

        output.push_str(&Self::section_header("Recommendation"));
        output.push_str(&format!("\n{}\n", result.recommendation));
        output.push_str(&format!(
            "\n{} {}\n",
            "Analyzed at:".dimmed(),
            result.analyzed_at.to_rfc3339()
        ));

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &AnalysisResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a bias check report
    pub fn format_bias(report: &BiasReport) -> String {
        if !report.has_bias {
            return format!("{} No loaded language found.\n", "✓".green());
        }

        let mut output = format!(
            "{} {}\n",
            "Overall tone:".cyan().bold(),
            Self::tone(report.overall_tone)
        );
        for flag in &report.flags {
            output.push_str(&format!(
                "  {} \"{}\" [{}] → {}\n",
                "!".yellow(),
                flag.term,
                Self::severity(flag.severity),
                flag.suggestion
            ));
        }
        output
    }

    fn decision(decision: Decision) -> ColoredString {
        match decision {
            Decision::Yes => decision.as_str().green().bold(),
            Decision::No => decision.as_str().red().bold(),
        }
    }

    fn tone(tone: OverallTone) -> ColoredString {
        match tone {
            OverallTone::Neutral => "neutral".green(),
            OverallTone::CautionAdvised => "caution advised".yellow(),
            OverallTone::Concerning => "concerning".red().bold(),
        }
    }

    fn severity(severity: Severity) -> ColoredString {
        match severity {
            Severity::Low => severity.as_str().dimmed(),
            Severity::Moderate => severity.as_str().yellow(),
            Severity::High => severity.as_str().red(),
        }
    }

    fn percent(ratio: f64) -> String {
        format!("{:.0}%", ratio * 100.0)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &AnalysisResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &AnalysisResult) -> String {
        Self::format_json(result)
    }

    fn format_bias(&self, report: &BiasReport) -> String {
        Self::format_bias(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        Abstention, AgentProfile, AgentRole, BiasChecker, ConsensusAggregator, Vote,
    };

    fn result() -> AnalysisResult {
        let lex = AgentProfile::new("Lex", AgentRole::LegalCompliance);
        let holmes = AgentProfile::new("Holmes", AgentRole::EvidenceAnalysis);
        let sentinel = AgentProfile::new("Sentinel", AgentRole::RiskAssessment);
        let breakdown = vec![
            AgentVerdict::from(
                Vote::new(&lex, Decision::Yes, 0.95, "Meets the severity standard.")
                    .with_citations(vec!["20 U.S.C. § 1681".to_string()]),
            ),
            AgentVerdict::from(Abstention::new(&holmes, "timed out after 120s")),
            AgentVerdict::from(Vote::new(&sentinel, Decision::No, 0.65, "Low risk.")),
        ];
        ConsensusAggregator::default()
            .aggregate("Within scope?", breakdown)
            .unwrap()
    }

    #[test]
    fn test_format_shows_breakdown_and_abstentions() {
        let output = ConsoleFormatter::format(&result());
        assert!(output.contains("Within scope?"));
        assert!(output.contains("Lex · Legal Compliance"));
        assert!(output.contains("20 U.S.C. § 1681"));
        assert!(output.contains("ABSTAINED"));
        assert!(output.contains("timed out after 120s"));
        assert!(output.contains("1 YES / 1 NO"));
        assert!(output.contains("Disagreement flagged"));
    }

    #[test]
    fn test_format_json_round_trips() {
        let original = result();
        let json = ConsoleFormatter::format_json(&original);
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_format_bias() {
        let checker = BiasChecker::default();

        let clean = ConsoleFormatter::format_bias(&checker.check("The meeting was rescheduled."));
        assert!(clean.contains("No loaded language"));

        let flagged = ConsoleFormatter::format_bias(&checker.check("She was hysterical."));
        assert!(flagged.contains("\"hysterical\""));
        assert!(flagged.contains("concerning"));
    }
}
