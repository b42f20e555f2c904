// Copyright (c) Lodgekeep Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("lodgekeep")
        .about("Hospitality back-office ledger, multi-currency accounts, and reservation settlement")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("account")
                .about("Manage ledger accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add a ledger account")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("currency").required(true))
                        .arg(
                            Arg::new("initial-balance")
                                .long("initial-balance")
                                .default_value("0")
                                .help("Opening balance in the account currency"),
                        )
                        .arg(
                            Arg::new("locations")
                                .long("locations")
                                .help("Comma-separated location ids; omit for unrestricted"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List accounts with derived balances"),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Remove an account (refused while transactions reference it)")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("currency")
                .about("Manage the USD-pivot exchange-rate table")
                .subcommand(
                    Command::new("add")
                        .about("Register a custom currency")
                        .arg(Arg::new("code").required(true))
                        .arg(Arg::new("rate").required(true).help("Units per 1 USD")),
                )
                .subcommand(
                    Command::new("update")
                        .about("Update a currency's USD rate")
                        .arg(Arg::new("code").required(true))
                        .arg(Arg::new("rate").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a custom currency")
                        .arg(Arg::new("code").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List registered currencies")))
                .subcommand(
                    Command::new("convert")
                        .about("Convert an amount between registered currencies")
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("from").required(true))
                        .arg(Arg::new("to").required(true)),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Record and list income")
                .subcommand(
                    Command::new("add")
                        .about("Record an income entry")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("general")
                                .help("Income category"),
                        )
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .default_value("cash")
                                .help("Payment method; 'pending' logs an uncollected charge"),
                        )
                        .arg(
                            Arg::new("location")
                                .long("location")
                                .value_parser(value_parser!(i64))
                                .default_value("0"),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("booking")
                                .long("booking")
                                .help("Reservation number this income belongs to"),
                        ),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List income entries"))
                        .arg(Arg::new("month").long("month").help("Filter YYYY-MM"))
                        .arg(Arg::new("account").long("account"))
                        .arg(
                            Arg::new("pending")
                                .long("pending")
                                .action(ArgAction::SetTrue)
                                .help("Only uncollected (pending) income"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense entry")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("main-type").long("main-type").default_value("general"))
                        .arg(Arg::new("sub-type").long("sub-type").default_value("general"))
                        .arg(
                            Arg::new("location")
                                .long("location")
                                .value_parser(value_parser!(i64))
                                .default_value("0"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List expense entries"))
                        .arg(Arg::new("month").long("month").help("Filter YYYY-MM"))
                        .arg(Arg::new("account").long("account"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move money between ledger accounts")
                .subcommand(
                    Command::new("add")
                        .about("Execute an inter-account transfer")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Amount in the source account currency"),
                        )
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .default_value("1")
                                .help("Destination units per source unit; must be 1 for same currency"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(Command::new("list").about("List transfers"))),
        )
        .subcommand(
            Command::new("reservation")
                .about("Manage reservations")
                .subcommand(
                    Command::new("add")
                        .about("Create a reservation")
                        .arg(Arg::new("room-rate").long("room-rate").required(true))
                        .arg(
                            Arg::new("nights")
                                .long("nights")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(
                            Arg::new("total")
                                .long("total")
                                .help("Override total; default is room rate x nights"),
                        )
                        .arg(
                            Arg::new("guide")
                                .long("guide")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("guide-rate")
                                .long("guide-rate")
                                .default_value("0")
                                .help("Guide commission percentage"),
                        )
                        .arg(
                            Arg::new("agent")
                                .long("agent")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("agent-rate")
                                .long("agent-rate")
                                .default_value("0")
                                .help("Agent commission percentage"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List reservations")))
                .subcommand(
                    Command::new("show")
                        .about("Reservation drill-down: payments and commissions")
                        .arg(Arg::new("number").required(true)),
                )
                .subcommand(
                    Command::new("set-total")
                        .about("Set a new total and recompute balance and commissions")
                        .arg(Arg::new("number").required(true))
                        .arg(Arg::new("amount").required(true)),
                )
                .subcommand(
                    Command::new("set-status")
                        .about("Set reservation status")
                        .arg(Arg::new("number").required(true))
                        .arg(Arg::new("status").required(true)),
                ),
        )
        .subcommand(
            Command::new("payment")
                .about("Record reservation payments")
                .subcommand(
                    Command::new("add")
                        .about("Apply a payment to a reservation")
                        .arg(Arg::new("reservation").long("reservation").required(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("Tender currency; must match the receiving account"),
                        )
                        .arg(Arg::new("method").long("method").default_value("cash"))
                        .arg(Arg::new("date").long("date").help("Defaults to today")),
                )
                .subcommand(
                    json_flags(Command::new("list").about("List payments"))
                        .arg(Arg::new("reservation").long("reservation")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Balances, statements, and reservation summaries")
                .subcommand(
                    json_flags(Command::new("balances").about("Derived balance per account"))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("Convert all balances into one currency"),
                        ),
                )
                .subcommand(
                    json_flags(
                        Command::new("statement")
                            .about("Running balance for one account, most recent first"),
                    )
                    .arg(Arg::new("account").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("reservations").about("Totals, paid, and outstanding balances"),
                )),
        )
        .subcommand(Command::new("doctor").about("Reconciliation and consistency checks"))
}
