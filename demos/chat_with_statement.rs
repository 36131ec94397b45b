use dotenv::dotenv;
use statement_analyzer::llm::{FinancialAnalyst, GeminiClient, GeminiSettings};
use statement_analyzer::{analyze, AnalysisConfig, StatementTable};
use std::error::Error;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/balance_sheet.csv".to_string());

    let table = StatementTable::from_csv_path(&path)?;
    let report = analyze(&table.items, &AnalysisConfig::default())?;

    let settings = GeminiSettings::default();
    let client = GeminiClient::from_settings(api_key, &settings);
    let analyst = FinancialAnalyst::new(client, settings.model.clone());

    println!("📝 Requesting quick commentary...\n");
    match analyst.commentary(&report.summary).await {
        Ok(text) => println!("{}\n", text),
        Err(e) => eprintln!("❌ Error: {}", e),
    }

    let mut chat = analyst.start_chat(&report.summary);
    for message in chat.messages() {
        println!("🤖 [{}] {}", message.sent_at.format("%H:%M"), message.content);
    }
    println!("------------------------------------------------------------------");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let prompt = input.trim();

        if prompt.eq_ignore_ascii_case("quit") || prompt.eq_ignore_ascii_case("exit") {
            break;
        }

        if prompt.eq_ignore_ascii_case("reset") {
            chat.reset();
            println!("🔄 Chat reset.");
            continue;
        }

        if prompt.is_empty() {
            continue;
        }

        println!("\nThinking...");

        match chat.send_message(prompt).await {
            Ok(response) => {
                println!("\n{}\n", response);
                println!("------------------------------------------------------------------");
            }
            Err(e) => {
                eprintln!("❌ Error: {}", e);
            }
        }
    }

    Ok(())
}
