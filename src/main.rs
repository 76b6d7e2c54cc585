use llk_parser::grammars::{self, Grammar};
use llk_parser::parser::LLkParser;
use llk_parser::sets::{compute_first_k, compute_follow_k, FirstSets, FollowSets};
use llk_parser::table::{build_table, ParseTable};

// Configuration
// Change this path to analyze a different grammar; the file's "k" field
// selects the lookahead depth.

const GRAMMAR_PATH: &str = "grammars/ab.json";

fn print_sets(grammar: &Grammar, first: &FirstSets, follow: &FollowSets) {
    println!("FIRST_{} sets:", first.k());
    for nt in grammar.sorted_nonterminals() {
        let strings: Vec<String> = first
            .of_nonterminal(nt)
            .map(|set| set.iter().map(|s| s.render(grammar)).collect())
            .unwrap_or_default();
        println!(
            "  {} : {{ {} }}",
            grammar.non_terminal_str(nt).unwrap_or("?"),
            strings.join(", ")
        );
    }

    println!("FOLLOW_{} sets:", follow.k());
    for nt in grammar.sorted_nonterminals() {
        let strings: Vec<String> = follow
            .of_nonterminal(nt)
            .map(|set| set.iter().map(|s| s.render(grammar)).collect())
            .unwrap_or_default();
        println!(
            "  {} : {{ {} }}",
            grammar.non_terminal_str(nt).unwrap_or("?"),
            strings.join(", ")
        );
    }
    println!();
}

fn print_table(grammar: &Grammar, table: &ParseTable) {
    let cells = table.cells_sorted();

    let mut rows: Vec<(String, String, String)> = Vec::with_capacity(cells.len());
    for (nt, lookahead, idx) in cells {
        let nt_str = grammar.non_terminal_str(nt).unwrap_or("?").to_string();
        let production = grammar.production_str(&grammar.rules[&nt][idx]);
        rows.push((nt_str, lookahead.render(grammar), production));
    }

    let col_width = rows
        .iter()
        .flat_map(|(nt, la, _)| [nt.chars().count(), la.chars().count()])
        .max()
        .unwrap_or(0)
        .max("Nonterminal".len())
        + 2;

    println!("Parsing table ({} cells):", rows.len());
    println!(
        "{:<width$}{:<width$}Production",
        "Nonterminal",
        "Lookahead",
        width = col_width
    );
    println!("{}", "-".repeat(col_width * 3));
    for (nt, lookahead, production) in rows {
        println!(
            "{:<width$}{:<width$}{}",
            nt,
            lookahead,
            production,
            width = col_width
        );
    }
    println!();
}

fn input_str(grammar: &Grammar, input: &[u32]) -> String {
    input
        .iter()
        .filter_map(|&t| grammar.terminal_str(t))
        .collect()
}

fn main() {
    println!("LL(k) Predictive Parser");
    println!("=======================\n");

    let (grammar, k) = match grammars::load_grammar_from_file(GRAMMAR_PATH) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading grammar: {}", e);
            eprintln!("Make sure to run from the project root directory.");
            return;
        }
    };

    println!("Grammar file: {} (k = {})", GRAMMAR_PATH, k);
    grammar.debug_print();

    let first = match compute_first_k(&grammar, k) {
        Ok(first) => first,
        Err(e) => {
            eprintln!("Grammar error: {}", e);
            return;
        }
    };
    let follow = compute_follow_k(&grammar, k, &first);
    print_sets(&grammar, &first, &follow);

    let (table, conflicts) = build_table(&grammar, &first, &follow);
    print_table(&grammar, &table);

    if !conflicts.is_empty() {
        eprintln!("Grammar is not LL({}): {} conflict(s)", k, conflicts.len());
        for conflict in &conflicts {
            eprintln!("  {}", conflict.render(&grammar));
        }
        return;
    }

    let parser = match LLkParser::new(&grammar, k) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("Error building parser: {}", e);
            return;
        }
    };

    for input in &grammar.tests {
        let rendered = input_str(&grammar, input);
        println!("Input \"{}\":", rendered);
        match parser.parse(input) {
            Ok(tree) => {
                println!("Input successfully parsed");
                println!("{}\n", tree.display());
            }
            Err(e) => println!("{}\n", e),
        }
    }
}
