use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Dashboard, DatabaseStore, MoneyCents, NewExpense, Share, Username};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "splitshare_admin")]
#[command(about = "Admin utilities for SplitShare dashboards")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./splitshare.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Expense(Expense),
    /// Print net balances of a dashboard.
    Balances(UserArgs),
    /// Print who pays whom.
    Settle(UserArgs),
    /// Delete every expense of a dashboard.
    Reset(UserArgs),
}

#[derive(Args, Debug)]
struct Expense {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
    List(UserArgs),
}

#[derive(Args, Debug)]
struct UserArgs {
    #[arg(long)]
    user: String,
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    #[arg(long)]
    user: String,
    #[arg(long)]
    category: String,
    #[arg(long, value_parser = parse_amount)]
    amount: MoneyCents,
    #[arg(long)]
    paid_by: String,
    /// `NAME` for an equal share or `NAME=AMOUNT` for a fixed one.
    #[arg(long = "participant", value_parser = parse_share)]
    participants: Vec<Share>,
    #[arg(long)]
    description: Option<String>,
}

fn parse_amount(raw: &str) -> Result<MoneyCents, String> {
    raw.parse::<MoneyCents>().map_err(|err| err.to_string())
}

fn parse_share(raw: &str) -> Result<Share, String> {
    match raw.split_once('=') {
        Some((name, amount)) => Ok(Share::fixed(name, parse_amount(amount)?)),
        None => Ok(Share::equal(raw)),
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let dashboard = Dashboard::new(DatabaseStore::new(db));

    match cli.command {
        Command::Expense(Expense {
            command: ExpenseCommand::Add(args),
        }) => {
            let expense = dashboard
                .store()
                .record_expense(NewExpense {
                    username: args.user,
                    category: args.category,
                    description: args.description,
                    amount: args.amount,
                    paid_by: args.paid_by,
                    shares: args.participants,
                })
                .await?;
            println!(
                "recorded expense: {} ({} paid by {})",
                expense.id, expense.amount, expense.paid_by
            );
        }
        Command::Expense(Expense {
            command: ExpenseCommand::List(args),
        }) => {
            let username = Username::parse(&args.user)?;
            for expense in dashboard.expenses(&username).await? {
                let participants: Vec<String> = expense
                    .shares
                    .iter()
                    .map(|share| match share.amount {
                        Some(amount) => format!("{}={amount}", share.participant),
                        None => share.participant.clone(),
                    })
                    .collect();
                println!(
                    "{}  {:<12} {:>10}  paid by {:<10} [{}]",
                    expense.created_at.format("%Y-%m-%d %H:%M"),
                    expense.category,
                    expense.amount,
                    expense.paid_by,
                    participants.join(", ")
                );
            }
        }
        Command::Balances(args) => {
            let username = Username::parse(&args.user)?;
            for (name, balance) in dashboard.net_balances(&username).await? {
                println!("{name}: {balance}");
            }
        }
        Command::Settle(args) => {
            let username = Username::parse(&args.user)?;
            let transfers = dashboard.transfers(&username).await?;
            if transfers.is_empty() {
                println!("all settled");
            }
            for transfer in transfers {
                println!("{transfer}");
            }
        }
        Command::Reset(args) => {
            let username = Username::parse(&args.user)?;
            let deleted = dashboard.reset(&username).await?;
            println!("deleted {deleted} expenses for {username}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_argument_forms() {
        assert_eq!(parse_share("ann").unwrap(), Share::equal("ann"));
        assert_eq!(
            parse_share("bob=12.50").unwrap(),
            Share::fixed("bob", MoneyCents::new(1250))
        );
        assert!(parse_share("bob=lots").is_err());
    }

    #[test]
    fn cli_parses_expense_add() {
        let cli = Cli::try_parse_from([
            "splitshare_admin",
            "expense",
            "add",
            "--user",
            "trip",
            "--category",
            "food",
            "--amount",
            "30",
            "--paid-by",
            "A",
            "--participant",
            "A",
            "--participant",
            "B",
        ])
        .unwrap();

        let Command::Expense(Expense {
            command: ExpenseCommand::Add(args),
        }) = cli.command
        else {
            panic!("expected expense add");
        };
        assert_eq!(args.amount, MoneyCents::new(3000));
        assert_eq!(args.participants.len(), 2);
    }
}
