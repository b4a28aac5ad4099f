use criterion::{Criterion, criterion_group, criterion_main};
use emmet_assist::config::ExpandOptions;
use emmet_assist::syntax::SyntaxKind;
use emmet_assist::tabstops::{collapse_to_preview, promote_final_tab_stop};
use emmet_assist::{
    AbbreviationEngine, Customizations, EmmetConfig, ExpandError, Position, compute_completions,
    is_abbreviation_valid,
};
use std::hint::black_box;

/// Engine that renders every abbreviation as a fixed-shape element
struct EchoEngine;

impl AbbreviationEngine for EchoEngine {
    fn expand(&self, abbreviation: &str, options: &ExpandOptions) -> Result<String, ExpandError> {
        match options.kind {
            SyntaxKind::Markup => {
                let tag = abbreviation.rsplit('>').next().unwrap_or(abbreviation);
                Ok(format!("<div>\n\t<{tag} class=\"${{1:name}}\">${{2}}</{tag}>\n</div>"))
            }
            SyntaxKind::Stylesheet => Ok(format!("margin: {}px;", abbreviation.len())),
        }
    }

    fn snippet_keys(&self, _syntax: &str) -> Vec<String> {
        ["a:link", "a:mail", "link:css", "input:text", "btn:s", "btn:r"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

fn bench_markup_completion(c: &mut Criterion) {
    let config = EmmetConfig::default();
    let customizations = Customizations::default();
    let line = format!("{}<div>ul>li</div>", " ".repeat(200));
    let column = 200 + 10;

    c.bench_function("markup completion with tag suggestions", |b| {
        b.iter(|| {
            compute_completions(
                &EchoEngine,
                black_box(line.as_str()),
                Position::new(0, column),
                "html",
                &config,
                &customizations,
            )
        })
    });
}

fn bench_stylesheet_completion(c: &mut Criterion) {
    let config = EmmetConfig::default();
    let customizations = Customizations::default();

    c.bench_function("stylesheet completion", |b| {
        b.iter(|| {
            compute_completions(
                &EchoEngine,
                black_box("  -wm-m10"),
                Position::new(0, 9),
                "scss",
                &config,
                &customizations,
            )
        })
    });
}

fn bench_validation(c: &mut Criterion) {
    let abbreviations = ["ul>li*3", "(header>nav)+main", "p{(hi)}", "just some prose", "span[onclick=\"x()\"]"];

    c.bench_function("validate 5 abbreviations", |b| {
        b.iter(|| {
            abbreviations
                .iter()
                .filter(|abbr| is_abbreviation_valid("html", black_box(abbr)))
                .count()
        })
    });
}

fn bench_tab_stops(c: &mut Criterion) {
    let expanded = (1..=100).map(|i| format!("<li>${{{i}}}</li>")).collect::<Vec<_>>().join("\n");

    c.bench_function("promote and preview 100 stops", |b| {
        b.iter(|| {
            let promoted = promote_final_tab_stop(black_box(&expanded));
            collapse_to_preview(&promoted)
        })
    });
}

criterion_group!(
    benches,
    bench_markup_completion,
    bench_stylesheet_completion,
    bench_validation,
    bench_tab_stops
);
criterion_main!(benches);
