use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cordex::data::{DataStore, Dataset};
use cordex::filter::{FilterCriteria, FilterEngine, YearRange};
use cordex::{Settings, Snapshot};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const JOURNALS: &[&str] = &[
    "Nature", "Science", "Lancet", "BMJ", "PLoS One", "Virology", "JAMA", "Cell",
];
const TITLE_WORDS: &[&str] = &[
    "covid", "sars-cov-2", "transmission", "vaccine", "model", "clinical", "outcomes", "cohort",
    "respiratory", "infection", "analysis", "public", "health",
];

fn create_metadata_file(rows: usize) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(temp_file, "cord_uid,title,abstract,journal,publish_time,url").unwrap();

    for row in 0..rows {
        let title: Vec<&str> = (0..6)
            .map(|i| TITLE_WORDS[(row * 7 + i * 3) % TITLE_WORDS.len()])
            .collect();
        let abstract_text = if row % 5 == 0 {
            String::new()
        } else {
            format!(
                "\"We study {} in {} patients, with {} follow-up.\"",
                TITLE_WORDS[row % TITLE_WORDS.len()],
                row % 900,
                TITLE_WORDS[(row / 3) % TITLE_WORDS.len()]
            )
        };
        let journal = if row % 11 == 0 {
            ""
        } else {
            JOURNALS[row % JOURNALS.len()]
        };
        let publish_time = match row % 4 {
            0 => format!("{}", 2000 + row % 22),
            1 => String::new(),
            _ => format!("{}-{:02}-{:02}", 2000 + row % 22, row % 12 + 1, row % 28 + 1),
        };
        writeln!(
            temp_file,
            "uid{row:07},{},{abstract_text},{journal},{publish_time},https://doi.org/{row}",
            title.join(" ")
        )
        .unwrap();
    }

    temp_file.flush().unwrap();
    temp_file
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(10);

    for &rows in &[10_000usize, 100_000] {
        let temp_file = create_metadata_file(rows);
        group.bench_with_input(BenchmarkId::new("parse", rows), &temp_file, |b, file| {
            b.iter(|| {
                let store = DataStore::from_path(file.path());
                black_box(store.load().unwrap().len())
            })
        });
    }

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    group.measurement_time(Duration::from_secs(5));

    let temp_file = create_metadata_file(100_000);
    let store = DataStore::from_path(temp_file.path());
    let dataset: &Dataset = store.load().unwrap();

    let cases = [
        ("inactive", FilterCriteria::new()),
        ("keyword", FilterCriteria::new().with_keyword("Vaccine")),
        (
            "years",
            FilterCriteria::new().with_year_range(Some(YearRange::new(2010, 2015))),
        ),
        (
            "combined",
            FilterCriteria::new()
                .with_keyword("covid")
                .with_year_range(Some(YearRange::new(2005, 2020)))
                .with_journals(["Nature", "Lancet"]),
        ),
    ];

    for (label, criteria) in &cases {
        group.bench_with_input(BenchmarkId::new("apply", label), criteria, |b, criteria| {
            b.iter(|| black_box(FilterEngine::apply(dataset, criteria).len()))
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    group.sample_size(20);

    let temp_file = create_metadata_file(100_000);
    let store = DataStore::from_path(temp_file.path());
    let dataset = store.load().unwrap();
    let settings = Settings::default();
    let criteria = FilterCriteria::new().with_keyword("model");

    group.bench_function("compute", |b| {
        b.iter(|| {
            let snapshot = Snapshot::compute(dataset, &criteria, &settings);
            black_box(snapshot.match_count())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_load, bench_filters, bench_snapshot);
criterion_main!(benches);
