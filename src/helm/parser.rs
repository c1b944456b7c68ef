use crate::helm::model::{MalformedRow, Resource, ResourceKind};

const RESOURCES_HEADER: &str = "RESOURCES:";
const SECTION_MARKER: &str = "==> ";

/// Parses the human readable output of `helm status`.
///
/// Only the part after the `RESOURCES:` header is considered. It consists of blank line
/// separated sections, each introduced by `==> <type>`, followed by a column header and rows.
/// Anything unexpected (notes, missing header, empty sections) is skipped, so an unparseable
/// report looks exactly like a release without resources.
///
/// Resources keep the report order: section by section, row by row.
pub fn parse(report: &str) -> Result<Vec<Resource>, MalformedRow> {
    let mut lines = report.lines();
    if !lines
        .by_ref()
        .any(|line| line.trim_end() == RESOURCES_HEADER)
    {
        return Ok(Vec::new());
    }

    let mut resources = Vec::new();
    for section in sections(lines) {
        resources.extend(parse_section(&section)?);
    }
    Ok(resources)
}

/// Groups lines into blank line separated blocks and keeps the ones opened by `==> `.
fn sections<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Vec<&'a str>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .filter(|group| group[0].starts_with(SECTION_MARKER))
        .collect()
}

fn parse_section(lines: &[&str]) -> Result<Vec<Resource>, MalformedRow> {
    let resource_type = lines[0][SECTION_MARKER.len()..].trim_end();
    let simple_type = simple_type(resource_type);

    // Second line holds column names.
    lines
        .iter()
        .skip(2)
        .map(|row| parse_row(resource_type, simple_type, row))
        .collect()
}

fn simple_type(resource_type: &str) -> &str {
    match resource_type.rsplit_once('/') {
        Some((_, simple)) if !simple.is_empty() => simple,
        _ => resource_type,
    }
}

fn parse_row(resource_type: &str, simple_type: &str, row: &str) -> Result<Resource, MalformedRow> {
    let columns: Vec<&str> = row.split_whitespace().collect();
    let number = |column: usize| {
        columns
            .get(column)
            .and_then(|value| value.parse::<u32>().ok())
            .ok_or_else(|| MalformedRow {
                resource_type: resource_type.to_owned(),
                line: row.to_owned(),
                column,
            })
    };

    let resource = Resource {
        name: columns[0].to_owned(),
        resource_type: resource_type.to_owned(),
        simple_type: simple_type.to_owned(),
        is_ready: true,
        desired: None,
        current: None,
        up_to_date: None,
        available: None,
        successful: None,
        status: None,
        volume: None,
    };

    let resource = match ResourceKind::from_simple_type(simple_type) {
        // NAME  DESIRED  SUCCESSFUL  AGE
        ResourceKind::Job => {
            let desired = number(1)?;
            let successful = number(2)?;
            Resource {
                desired: Some(desired),
                successful: Some(successful),
                is_ready: desired == successful,
                ..resource
            }
        }
        // NAME  STATUS  VOLUME  CAPACITY  ACCESSMODES  AGE
        ResourceKind::PersistentVolumeClaim => {
            let status = columns.get(1).map(|status| status.to_string());
            Resource {
                is_ready: status.as_deref() == Some("Bound"),
                status,
                volume: columns.get(2).map(|volume| volume.to_string()),
                ..resource
            }
        }
        // NAME  DESIRED  CURRENT  UP-TO-DATE  AVAILABLE  AGE
        ResourceKind::Deployment => {
            let available = number(4)?;
            Resource {
                desired: Some(number(1)?),
                current: Some(number(2)?),
                up_to_date: Some(number(3)?),
                available: Some(available),
                is_ready: available > 0,
                ..resource
            }
        }
        ResourceKind::Other => resource,
    };
    Ok(resource)
}
