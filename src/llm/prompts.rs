// Prompts for the narrative assistant. Both embed the plain-text analysis summary.

pub const ASSISTANT_NAME: &str = "Statement Analyst";

pub const CHAT_GREETING: &str = "Hello! I'm your statement analyst. Your financial data is ready. \
Ask me about **growth rates**, **asset structure**, or any indicator in this report.";

/// One-shot commentary request: a short, objective assessment of the statement.
pub fn commentary_prompt(summary_text: &str) -> String {
    format!(
        r#"You are a professional financial analyst. Based on the financial indicators below, write an objective, concise assessment (about 3-4 paragraphs) of the company's financial position. Focus on growth rates, changes in asset structure, and the current ratio.

Raw data and indicators:
{}"#,
        summary_text
    )
}

/// System instruction for a follow-up chat grounded in the analysed statement.
pub fn chat_system_instruction(summary_text: &str) -> String {
    format!(
        r#"You are a professional financial analyst named {}.
Your job is to help the user dig deeper into the financial statement they uploaded.

The processed statement data (growth rates and composition shares) is:
{}

Answer the user's questions about this data, keep the financial context, and give in-depth, objective observations. Do not repeat the data above in your answers; just answer the question."#,
        ASSISTANT_NAME, summary_text
    )
}
