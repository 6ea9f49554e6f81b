// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("YYYY-MM-DD, defaults to today")
}

fn amount_arg() -> Arg {
    Arg::new("amount")
        .long("amount")
        .required(true)
        .allow_hyphen_values(true)
        .help("Amount; a comma works as the decimal separator")
}

fn note_arg() -> Arg {
    Arg::new("note").long("note")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn month_filter() -> Arg {
    Arg::new("month").long("month").help("YYYY-MM")
}

fn limit_arg() -> Arg {
    Arg::new("limit")
        .long("limit")
        .value_parser(value_parser!(usize))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Income and expense transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add-income")
                .about("Record income")
                .arg(date_arg())
                .arg(amount_arg())
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("not-taxable")
                        .long("not-taxable")
                        .action(ArgAction::SetTrue)
                        .help("Exclude from the flat-rate tax base"),
                )
                .arg(note_arg()),
        )
        .subcommand(
            Command::new("add-expense")
                .about("Record an expense")
                .arg(date_arg())
                .arg(amount_arg())
                .arg(Arg::new("category").long("category"))
                .arg(note_arg()),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(month_filter().help("YYYY-MM or YYYY"))
                .arg(limit_arg()),
        ))
        .subcommand(
            Command::new("edit")
                .about("Edit a transaction")
                .arg(id_arg())
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("category").long("category"))
                .arg(note_arg())
                .arg(
                    Arg::new("taxable")
                        .long("taxable")
                        .value_parser(value_parser!(bool))
                        .help("true|false, income only"),
                ),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
        .subcommand(
            Command::new("categories")
                .about("Categories already in use")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .default_value("expense")
                        .help("income | expense"),
                ),
        )
}

fn loan_cmd() -> Command {
    Command::new("loan")
        .about("Installment loans")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a loan")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("balance").long("balance").required(true))
                .arg(Arg::new("monthly").long("monthly").required(true))
                .arg(Arg::new("day").long("day").required(true).help("Payment day, 1-28"))
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .required(true)
                        .help("Annual rate in percent, 0-200"),
                ),
        )
        .subcommand(json_args(Command::new("list").about("List loans")))
        .subcommand(
            Command::new("pay")
                .about("Record a loan payment")
                .arg(Arg::new("loan").required(true).help("Loan id or title"))
                .arg(amount_arg())
                .arg(date_arg()),
        )
        .subcommand(json_args(
            Command::new("payments")
                .about("Payment history")
                .arg(Arg::new("loan").help("Loan id or title")),
        ))
        .subcommand(Command::new("rm").about("Delete a loan").arg(Arg::new("loan").required(true)))
}

fn card_cmd() -> Command {
    Command::new("card")
        .about("Credit cards")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a credit card")
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("balance").long("balance").default_value("0"))
                .arg(Arg::new("statement-day").long("statement-day").required(true))
                .arg(Arg::new("due-day").long("due-day").required(true))
                .arg(
                    Arg::new("min-rate")
                        .long("min-rate")
                        .default_value("5")
                        .help("Minimum payment in percent of balance"),
                ),
        )
        .subcommand(json_args(Command::new("list").about("List cards")))
        .subcommand(
            Command::new("pay")
                .about("Record a card payment")
                .arg(Arg::new("card").required(true).help("Card id or title"))
                .arg(amount_arg())
                .arg(date_arg())
                .arg(note_arg()),
        )
        .subcommand(
            Command::new("interest")
                .about("Record charged interest")
                .arg(Arg::new("card").required(true).help("Card id or title"))
                .arg(amount_arg())
                .arg(date_arg())
                .arg(note_arg()),
        )
        .subcommand(json_args(
            Command::new("events")
                .about("Card event history")
                .arg(Arg::new("card").help("Card id or title")),
        ))
        .subcommand(Command::new("rm").about("Delete a card").arg(Arg::new("card").required(true)))
}

fn tax_cmd() -> Command {
    Command::new("tax")
        .about("Tax reserve")
        .subcommand_required(true)
        .subcommand(
            Command::new("settings")
                .about("Show or update tax settings")
                .arg(Arg::new("fixed").long("fixed").help("Annual fixed levy"))
                .arg(
                    Arg::new("extra-rate")
                        .long("extra-rate")
                        .help("Progressive surcharge in percent"),
                ),
        )
        .subcommand(
            Command::new("pay")
                .about("Record a tax payment")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .help("flat_rate | fixed_levy | progressive | unallocated"),
                )
                .arg(amount_arg())
                .arg(date_arg())
                .arg(
                    Arg::new("undated")
                        .long("undated")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("date")
                        .help("Record without a date; it is not mirrored to the ledger"),
                )
                .arg(note_arg()),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List tax payments")
                .arg(Arg::new("year").long("year").help("YYYY")),
        ))
        .subcommand(json_args(Command::new("status").about("Reserve for the current year")))
        .subcommand(Command::new("rm").about("Delete a tax payment").arg(id_arg()))
}

fn savings_cmd() -> Command {
    Command::new("savings")
        .about("Savings goal")
        .subcommand_required(true)
        .subcommand(
            Command::new("settings")
                .about("Show or update the goal")
                .arg(Arg::new("goal").long("goal"))
                .arg(Arg::new("monthly").long("monthly")),
        )
        .subcommand(
            Command::new("add")
                .about("Record a contribution")
                .arg(amount_arg())
                .arg(date_arg())
                .arg(note_arg()),
        )
        .subcommand(Command::new("add-recommended").about("Save today's recommended amount"))
        .subcommand(
            Command::new("edit")
                .about("Edit a contribution")
                .arg(id_arg())
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date"))
                .arg(note_arg()),
        )
        .subcommand(Command::new("rm").about("Delete a contribution").arg(id_arg()))
        .subcommand(json_args(
            Command::new("list")
                .about("List contributions")
                .arg(month_filter())
                .arg(limit_arg()),
        ))
        .subcommand(json_args(Command::new("status").about("Progress toward the goal")))
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Recurring monthly obligations")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a recurring obligation")
                .arg(Arg::new("title").long("title").required(true))
                .arg(amount_arg())
                .arg(Arg::new("day").long("day").required(true).help("Pay day, 1-28")),
        )
        .subcommand(json_args(Command::new("list").about("Obligations and this month's status")))
        .subcommand(
            Command::new("pay")
                .about("Mark paid for a month")
                .arg(id_arg())
                .arg(month_filter().help("YYYY-MM, defaults to the current month"))
                .arg(date_arg())
                .arg(Arg::new("amount").long("amount")),
        )
        .subcommand(Command::new("deactivate").about("Stop tracking").arg(id_arg()))
        .subcommand(Command::new("rm").about("Delete").arg(id_arg()))
}

fn month_cmd() -> Command {
    Command::new("month")
        .about("Month carryover")
        .subcommand_required(true)
        .subcommand(
            Command::new("close")
                .about("Carry a month's closing balance into the next one")
                .arg(month_filter().help("YYYY-MM, defaults to the previous month")),
        )
        .subcommand(json_args(Command::new("list").about("List carry-ins")))
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal ledger with loans, cards, tax reserve, savings and daily limits")
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More log output (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(tx_cmd())
        .subcommand(loan_cmd())
        .subcommand(card_cmd())
        .subcommand(tax_cmd())
        .subcommand(savings_cmd())
        .subcommand(recurring_cmd())
        .subcommand(month_cmd())
        .subcommand(json_args(
            Command::new("summary")
                .about("This month's budget and obligations")
                .arg(Arg::new("date").long("date").help("Evaluate as of YYYY-MM-DD"))
                .arg(
                    Arg::new("policy")
                        .long("policy")
                        .help("forecast | cash, overrides the stored setting"),
                ),
        ))
        .subcommand(
            Command::new("config")
                .about("Runtime settings")
                .subcommand_required(true)
                .subcommand(Command::new("get").arg(Arg::new("key")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true).allow_hyphen_values(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv | json"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(month_filter().help("YYYY-MM or YYYY")),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check balances against their event logs")
                .arg(
                    Arg::new("apply")
                        .long("apply")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite drifted balances with rebuilt ones"),
                ),
        )
}
