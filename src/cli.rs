//! Command-line interface definition using clap.

use clap::Parser;

/// Analyze chat exports from Messenger, Instagram, WhatsApp, and Telegram
/// into a quantitative communication profile (JSON).
#[derive(Parser, Debug)]
#[command(name = "rapport")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    rapport message_1.json
    rapport message_1.json message_2.json -o report.json
    rapport chat.txt --platform wa --pretty
    rapport result.json --platform tg")]
pub struct Args {
    /// Export file(s); multi-part exports of one conversation are merged
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Platform override (detected from the file when omitted)
    #[arg(short, long, value_enum, value_name = "PLATFORM")]
    pub platform: Option<crate::parser::Platform>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Suppress the progress banner on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl clap::ValueEnum for crate::parser::Platform {
    fn value_variants<'a>() -> &'a [Self] {
        crate::parser::Platform::all()
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        use crate::parser::Platform;
        Some(match self {
            Platform::Messenger => clap::builder::PossibleValue::new("messenger").alias("fb"),
            Platform::Instagram => clap::builder::PossibleValue::new("instagram").alias("ig"),
            Platform::WhatsApp => clap::builder::PossibleValue::new("whatsapp").alias("wa"),
            Platform::Telegram => clap::builder::PossibleValue::new("telegram").alias("tg"),
        })
    }
}
