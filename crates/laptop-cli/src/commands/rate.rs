// crates/laptop-cli/src/commands/rate.rs
//
// `laptop rate <id:score>...`: rate laptops over one bidirectional stream.

use clap::Args;

use super::ConnectOpts;
use crate::output::{format_json, format_table, OutputFormat, RatingRow};

#[derive(Debug, Args)]
pub struct RateCmd {
    /// Ratings as `LAPTOP_ID:SCORE`, sent in order.
    #[arg(required = true, value_parser = parse_rating)]
    pub ratings: Vec<(String, f64)>,
}

/// Parse `LAPTOP_ID:SCORE`.
pub fn parse_rating(s: &str) -> Result<(String, f64), String> {
    let (id, score) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected LAPTOP_ID:SCORE, got {:?}", s))?;
    if id.is_empty() {
        return Err(format!("missing laptop id in {:?}", s));
    }
    let score: f64 = score
        .parse()
        .map_err(|_| format!("invalid score in {:?}", s))?;
    Ok((id.to_string(), score))
}

/// Run the rate command.
pub async fn run(
    opts: &ConnectOpts,
    cmd: &RateCmd,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut client = opts.laptop_client().await?;
    let responses = client.rate_laptops(cmd.ratings.clone()).await?;
    let rows: Vec<RatingRow> = responses.iter().map(RatingRow::from).collect();

    match format {
        OutputFormat::Json => println!("{}", format_json(&rows)),
        OutputFormat::Table => println!("{}", format_table(&rows)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        let (id, score) = parse_rating("8b7f3c2e-0000-4000-8000-000000000001:7.5").unwrap();
        assert_eq!(id, "8b7f3c2e-0000-4000-8000-000000000001");
        assert_eq!(score, 7.5);
    }

    #[test]
    fn test_parse_rating_errors() {
        assert!(parse_rating("no-score").is_err());
        assert!(parse_rating(":5").is_err());
        assert!(parse_rating("abc:high").is_err());
    }
}
