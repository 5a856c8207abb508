use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use payreport::application::query::PaymentQueryService;
use payreport::domain::ordering::{PaymentOrder, SortDirection, SortKey};
use payreport::domain::period::YearMonth;
use payreport::domain::ports::{ClockSourceBox, PaymentSourceBox};
use payreport::infrastructure::clock::{FixedClock, SystemClock};
use payreport::infrastructure::file::{FileFormat, FilePaymentSource};
use payreport::interfaces::report::ReportWriter;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payments file (CSV or JSON)
    input: PathBuf,

    /// Input format. Inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    format: Option<FileFormat>,

    /// Pin "now" to this RFC 3339 timestamp instead of the system clock.
    #[arg(long, env = "PAYREPORT_AS_OF", value_parser = parse_timestamp)]
    as_of: Option<DateTime<FixedOffset>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// All payments in a chosen order
    Sorted {
        #[arg(long, value_enum, default_value_t = SortField::Date)]
        by: SortField,
        #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
        order: SortOrder,
    },
    /// Payments made in a month (defaults to the current month)
    Month { month: Option<YearMonth> },
    /// Payments made within the last N days
    Recent {
        #[arg(long, allow_negative_numbers = true)]
        days: i64,
    },
    /// Payments with exactly one item
    SingleItem,
    /// Distinct products sold this month
    Products,
    /// Sum of final prices for a month (defaults to the current month)
    Total {
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Sum of discounts for a month (defaults to the current month)
    Discounts {
        #[arg(long)]
        month: Option<YearMonth>,
    },
    /// Items bought by the user with this email
    Items {
        #[arg(long)]
        email: String,
    },
    /// Payments whose regular-price total exceeds a value
    Over {
        #[arg(long, allow_negative_numbers = true)]
        value: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortField {
    Date,
    Items,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrder {
    Asc,
    Desc,
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let source = match cli.format {
        Some(format) => FilePaymentSource::with_format(&cli.input, format),
        None => FilePaymentSource::open(&cli.input),
    };
    tracing::info!(input = %cli.input.display(), format = ?source.format(), "reading payments");
    let source: PaymentSourceBox = Box::new(source);

    let clock: ClockSourceBox = match cli.as_of {
        Some(instant) => {
            tracing::info!(%instant, "using pinned clock");
            Box::new(FixedClock::new(instant))
        }
        None => Box::new(SystemClock),
    };
    let current_month = clock.current_year_month();

    let service = PaymentQueryService::new(source, clock);
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());

    match cli.command {
        Command::Sorted { by, order } => {
            let key = match by {
                SortField::Date => SortKey::Date,
                SortField::Items => SortKey::ItemCount,
            };
            let direction = match order {
                SortOrder::Asc => SortDirection::Ascending,
                SortOrder::Desc => SortDirection::Descending,
            };
            let payments = service
                .sorted_by(PaymentOrder::new(key, direction))
                .into_diagnostic()?;
            writer.write_payments(&payments).into_diagnostic()?;
        }
        Command::Month { month } => {
            let payments = match month {
                Some(month) => service.for_month(month),
                None => service.for_current_month(),
            }
            .into_diagnostic()?;
            writer.write_payments(&payments).into_diagnostic()?;
        }
        Command::Recent { days } => {
            let payments = service.for_last_n_days(days).into_diagnostic()?;
            writer.write_payments(&payments).into_diagnostic()?;
        }
        Command::SingleItem => {
            let payments = service.with_exactly_one_item().into_diagnostic()?;
            writer.write_payment_set(payments).into_diagnostic()?;
        }
        Command::Products => {
            let names = service.products_sold_this_month().into_diagnostic()?;
            writer.write_names(names).into_diagnostic()?;
        }
        Command::Total { month } => {
            let total = service
                .total_for_month(month.unwrap_or(current_month))
                .into_diagnostic()?;
            writer.write_amount(total).into_diagnostic()?;
        }
        Command::Discounts { month } => {
            let total = service
                .discount_total_for_month(month.unwrap_or(current_month))
                .into_diagnostic()?;
            writer.write_amount(total).into_diagnostic()?;
        }
        Command::Items { email } => {
            let items = service.items_for_user_email(&email).into_diagnostic()?;
            writer.write_items(&items).into_diagnostic()?;
        }
        Command::Over { value } => {
            let payments = service.payments_over_value(value).into_diagnostic()?;
            writer.write_payment_set(payments).into_diagnostic()?;
        }
    }

    Ok(())
}
