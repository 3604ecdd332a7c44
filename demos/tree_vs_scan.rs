use volatility_avl::data_gen::{SyntheticConfig, generate_price_records};
use volatility_avl::{Side, StockBook, build_both, query_both};

fn main() {
    let config = SyntheticConfig {
        groups: 50,
        days: 250,
        seed: 7,
    };
    let records = generate_price_records(config).unwrap();
    let book = StockBook::from_records(&records);

    let report = build_both(book.key_stream());
    println!("{report}\n");

    for ticker in book.groups().iter().take(3) {
        for side in [Side::Buy, Side::Sell] {
            let target = book.extreme(ticker, side).unwrap();
            println!("{side} {ticker}: {} on {}", target.key, target.timestamp);
            println!("{}\n", query_both(&report.tree, &report.baseline, &target.key));
        }
    }
}
