use wires::*;

/// Simulates a, b, their sum, an accumulator of the sum and the largest of a and b for 6 cycles.
fn run_demo() -> Result<Histories, SimError> {
    let mut g = CircuitBuilder::new();

    wire!(g, a = 1);
    wire!(g, b = 2);
    wire!(g, sum);
    wire!(g, acc);
    wire!(g, maxab);

    g.assign(sum, a + b);
    g.register(acc, acc + sum);
    g.assign(maxab, select(Expr::from(a).greater(b), a, b));

    let c = &mut g.init();
    c.simulate(&[acc, maxab], 6, true)
}

fn main() {
    match run_demo() {
        Ok(histories) => {
            for (name, history) in &histories {
                let values: Vec<_> = history.iter().map(i64::to_string).collect();
                println!("{}: {}", name, values.join(", "));
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_histories() {
        let h = run_demo().unwrap();
        assert_eq!(
            h.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "acc", "b", "maxab", "sum"]
        );
        assert_eq!(h["acc"], vec![0, 3, 6, 9, 12, 15]);
        assert_eq!(h["maxab"], vec![2; 6]);
        assert_eq!(h["sum"], vec![3; 6]);
    }
}
