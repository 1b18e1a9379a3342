use anyhow::{anyhow, Result};

const FIRST_PLACEHOLDER: &str = "{first}";
const SECOND_PLACEHOLDER: &str = "{second}";

const DEFAULT_TEMPLATE: &str = r#"You are an expert chemist and a chemical reaction simulator for a fun crafting game.
Your task is to predict the simplest and most plausible chemical product(s) when two chemical elements or very simple compounds are combined.
Provide ONLY the resulting chemical formula(s). If there are multiple products, separate them with " + ". Do NOT include any additional text, explanations, or balancing numbers.
If the combination does not form any common, stable, simple chemical products under typical game-like conditions, respond with "No reaction".

Examples:
Input: "H" and "O" -> Output: "H2O"
Input: "Na" and "Cl" -> Output: "NaCl"
Input: "C" and "O" -> Output: "CO2"
Input: "Fe" and "O" -> Output: "Fe2O3"
Input: "N" and "H" -> Output: "NH3"
Input: "He" and "Ne" -> Output: "No reaction"
Input: "H2O" and "C" -> Output: "CO + H2"
Input: "CH4" and "O2" -> Output: "CO2 + H2O"
Input: "CO2" and "H2O" -> Output: "H2CO3"
Input: "NaCl" and "H2O" -> Output: "No reaction"
Input: "H2O2" and "MnO2" -> Output: "H2O + O2"

What are the primary chemical product(s) or "No reaction" when you combine "{first}" and "{second}"?
Provide ONLY the chemical formula(s) separated by " + ". If no reaction, provide "No reaction"."#;

/// Instruction text sent to the oracle, parameterized by the two labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for placeholder in [FIRST_PLACEHOLDER, SECOND_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(anyhow!("prompt template is missing the {} placeholder", placeholder));
            }
        }
        Ok(Self { template })
    }

    pub fn render(&self, first: &str, second: &str) -> String {
        // Substitute `{second}` through a marker so a label that itself
        // contains "{second}" is not expanded twice.
        const MARKER: &str = "\u{0}SECOND\u{0}";
        self.template
            .replace(SECOND_PLACEHOLDER, MARKER)
            .replace(FIRST_PLACEHOLDER, first)
            .replace(MARKER, second)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}
