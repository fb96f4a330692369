use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use daily_standup::notify::compose;
use daily_standup::report::Report;
use daily_standup::summary::build_prompt;
use standup_git::CommitRecord;

/// Build a report with `n` multi-line commits
fn sample_report(n: usize) -> Report {
    let date = NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date");
    let commits = (0..n)
        .map(|i| CommitRecord {
            hash: format!("{:08x}", i),
            author: format!("Author {}", i % 3),
            date,
            message: format!("feat: change number {i}\n\nBody line one.\nBody line two."),
        })
        .collect();
    Report::new(date, commits, "Worked on many changes.".to_string())
}

fn report_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");

    for size in [0, 10, 100] {
        let report = sample_report(size);

        group.bench_with_input(BenchmarkId::new("render", size), &report, |b, r| {
            b.iter(|| r.render())
        });

        group.bench_with_input(BenchmarkId::new("compose_email", size), &report, |b, r| {
            b.iter(|| compose("me@example.com", "team@example.slack.com", r))
        });

        group.bench_with_input(BenchmarkId::new("build_prompt", size), &report, |b, r| {
            b.iter(|| build_prompt(r.commits()))
        });
    }

    group.finish();
}

criterion_group!(benches, report_benchmarks);
criterion_main!(benches);
