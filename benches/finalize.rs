use criterion::{black_box, criterion_group, criterion_main, Criterion};
use optio::{option, Command};

fn arguments(count: usize) -> Vec<String> {
    (0..count)
        .flat_map(|index| match index % 3 {
            0 => vec!["--rev".to_owned(), format!("v{index}")],
            1 => vec!["--config".to_owned(), format!("key{index}"), index.to_string()],
            _ => vec!["-n".to_owned(), (index % 200).to_string()],
        })
        .collect()
}

fn parse(c: &mut Criterion) {
    let mut command = Command::new("bench");
    let rev = option()
        .default("HEAD".to_owned())
        .bind(&mut command, "rev")
        .expect("'--rev' should bind");
    let config = option()
        .paired()
        .multiple()
        .bind(&mut command, "config")
        .expect("'--config' should bind");
    let retries = option()
        .names(["--retries", "-n"])
        .parse::<u8>()
        .default(3)
        .bind(&mut command, "retries")
        .expect("'--retries' should bind");

    let mut group = c.benchmark_group("parse");
    for count in [0, 10, 1000] {
        let arguments = arguments(count);
        group.bench_function(format!("{count}"), |b| {
            b.iter(|| {
                command
                    .parse_with(arguments.iter().cloned())
                    .expect("generated arguments should parse");
                black_box((rev.value(), config.value(), retries.value()))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, parse);
criterion_main!(benches);
