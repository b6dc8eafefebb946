use super::*;

#[test]
fn parses_harvest_with_defaults() {
    let cli = Cli::try_parse_from(["alkoharvest-cli", "harvest"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Harvest {
            ref categories,
            page_size: None,
            output: None,
            format: OutputFormat::Jsonl,
        } if categories.is_empty()
    ));
}

#[test]
fn parses_repeated_categories() {
    let cli = Cli::try_parse_from([
        "alkoharvest-cli",
        "harvest",
        "--category",
        "vino-1",
        "--category",
        "https://alkoteka.com/catalog/pivo-2",
    ])
    .unwrap();

    let Commands::Harvest { categories, .. } = cli.command;
    assert_eq!(categories, vec!["vino-1", "https://alkoteka.com/catalog/pivo-2"]);
}

#[test]
fn parses_output_format_and_page_size() {
    let cli = Cli::try_parse_from([
        "alkoharvest-cli",
        "harvest",
        "--page-size",
        "24",
        "--output",
        "items.json",
        "--format",
        "json",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Harvest {
            page_size: Some(24),
            output: Some(ref path),
            format: OutputFormat::Json,
            ..
        } if path.as_os_str() == "items.json"
    ));
}

#[test]
fn rejects_zero_page_size() {
    let result = Cli::try_parse_from(["alkoharvest-cli", "harvest", "--page-size", "0"]);
    assert!(result.is_err());
}

#[test]
fn rejects_unknown_format() {
    let result = Cli::try_parse_from(["alkoharvest-cli", "harvest", "--format", "csv"]);
    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["alkoharvest-cli"]).is_err());
}
