use cfr_webclient::codeforces::*;
use cfr_webclient::*;
use scraper::Html;

const CONTEST_HTML: &str = include_str!("fixtures/contest.html");
const PROBLEM_HTML: &str = include_str!("fixtures/problem.html");

#[test]
fn scrape_problem_ids_in_table_order() {
    let doc = Html::parse_document(CONTEST_HTML);
    let ids: Vec<String> = scrape_problem_ids(&doc)
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(ids, vec!["A", "B", "C1"]);
}

#[test]
fn scrape_problem_ids_fails_without_table() {
    let doc = Html::parse_document("<html><body><p>Contest not found</p></body></html>");
    assert!(matches!(
        scrape_problem_ids(&doc),
        Err(Error::NoSuchElementMatchesToSelector(_))
    ));
}

#[test]
fn scrape_title_drops_label() {
    let doc = Html::parse_document(PROBLEM_HTML);
    assert_eq!(scrape_title(&doc).as_deref(), Some("Theatre Square"));
}

#[test]
fn scrape_title_missing() {
    let doc = Html::parse_document("<html><body></body></html>");
    assert_eq!(scrape_title(&doc), None);
}

#[test]
fn scrape_samples_pairs_inputs_and_outputs() {
    let doc = Html::parse_document(PROBLEM_HTML);
    let samples = scrape_samples(&doc, "https://codeforces.com/contest/1/problem/A").unwrap();
    assert_eq!(
        samples,
        vec![
            SampleTestcase {
                ord: 1,
                input: "6 6 4\n".to_owned(),
                output: "4\n".to_owned(),
            },
            SampleTestcase {
                ord: 2,
                input: "2\n1 < 2\n".to_owned(),
                output: "YES\n\nNO\n".to_owned(),
            },
        ]
    );
}

#[test]
fn scrape_samples_rejects_unpaired_blocks() {
    let html = r#"<div class="sample-test">
        <div class="input"><pre>1</pre></div>
        <div class="input"><pre>2</pre></div>
        <div class="output"><pre>1</pre></div>
    </div>"#;
    let doc = Html::parse_document(html);
    let err = scrape_samples(&doc, "https://codeforces.com/contest/1/problem/A").unwrap_err();
    assert!(matches!(
        err,
        Error::UnpairedSamples {
            inputs: 2,
            outputs: 1,
            ..
        }
    ));
}

#[test]
fn problem_url_of_source() {
    let cli = CodeforcesClient::new().unwrap();
    let id = ProblemId::parse("c1").unwrap();
    assert_eq!(
        cli.problem_url(1, &id).unwrap().as_str(),
        "https://codeforces.com/contest/1/problem/C1"
    );
    assert_eq!(cli.platform(), Platform::Codeforces);
}
