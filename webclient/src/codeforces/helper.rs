use scraper::Html;

use crate::{
    error::*,
    model::{self, ProblemId, SampleTestcase},
    util::{self, DocExt as _, ElementRefExt as _},
};

/// Problem ids listed in the contest's problem table, in table order.
pub fn scrape_problem_ids(doc: &Html) -> Result<Vec<ProblemId>> {
    let sel_table = util::selector_must_parsed("table.problems");
    let sel_id = util::selector_must_parsed("td.id");

    let table = doc.select_first(&sel_table)?;
    let ids = table
        .select(&sel_id)
        .filter_map(|td| {
            let text = td.text().collect::<String>();
            match ProblemId::parse(&text) {
                Ok(id) => Some(id),
                Err(e) => {
                    log::warn!("Skipping problem table entry: {}", e);
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    if ids.is_empty() {
        return Err(Error::NoSuchElementMatchesToSelector(sel_id));
    }
    Ok(ids)
}

/// Title without the leading "A. " label; `None` if the page has no title block.
pub fn scrape_title(doc: &Html) -> Option<String> {
    let sel = util::selector_must_parsed(".problem-statement .header .title");
    let el = doc.select(&sel).next()?;
    let s = el.text().collect::<String>();
    let s = s.trim();
    let title = match s.split_once(". ") {
        Some((_label, title)) => title,
        None => s,
    };
    Some(title.trim().to_owned())
}

/// Sample tests of a problem page, pairing the n-th input with the n-th output.
pub fn scrape_samples(doc: &Html, requested_url: &str) -> Result<Vec<SampleTestcase>> {
    let sel_input = util::selector_must_parsed(".sample-test .input pre");
    let sel_output = util::selector_must_parsed(".sample-test .output pre");

    let inputs: Vec<String> = doc
        .select(&sel_input)
        .map(|pre| model::strip_blank_lines(pre.text_lines()))
        .collect();
    let outputs: Vec<String> = doc
        .select(&sel_output)
        .map(|pre| model::strip_blank_lines(pre.text_lines()))
        .collect();

    if inputs.len() != outputs.len() {
        return Err(Error::UnpairedSamples {
            inputs: inputs.len(),
            outputs: outputs.len(),
            requested_url: requested_url.to_owned(),
        });
    }

    let cases = inputs
        .into_iter()
        .zip(outputs)
        .enumerate()
        .map(|(i, (input, output))| SampleTestcase {
            ord: (i + 1) as u32,
            input,
            output,
        })
        .collect();
    Ok(cases)
}
