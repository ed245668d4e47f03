//! Filter → query-string rule shared by every stats endpoint.
//!
//! A field is only sent when it differs from its no-op sentinel: `Both` for
//! season and sex, `All` for sport and country, `Total` for the medal type and
//! an unset/zero year. Sentinels are never sent literally.

use crate::{FilterState, YearSelection};

pub type QueryParams = Vec<(&'static str, String)>;

/// Query parameters for the year-scoped series (map, biometrics, medals, ...).
pub fn filter_params(filters: &FilterState) -> QueryParams {
    let mut params = QueryParams::new();
    if let YearSelection::Specific(year) = filters.year
        && year > 0
    {
        params.push(("year", year.to_string()));
    }
    push_scope_params(filters, &mut params);
    params
}

/// Query parameters for the evolution series. The year is never sent and each
/// requested country code is repeated as its own `countries` pair.
pub fn evolution_params(filters: &FilterState, countries: &[String]) -> QueryParams {
    let mut params = QueryParams::new();
    push_scope_params(filters, &mut params);
    params.extend(
        countries
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| ("countries", c.clone())),
    );
    params
}

fn push_scope_params(filters: &FilterState, params: &mut QueryParams) {
    if let Some(season) = filters.season.as_param() {
        params.push(("season", season.to_string()));
    }
    if let Some(sex) = filters.sex.as_param() {
        params.push(("sex", sex.to_string()));
    }
    if filters.has_sport() {
        params.push(("sport", filters.sport.clone()));
    }
    if filters.has_country() {
        params.push(("country", filters.country.clone()));
    }
    if let Some(medal_type) = filters.medal_type.as_param() {
        params.push(("medal_type", medal_type.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MedalType, Season, Sex};

    fn names(params: &QueryParams) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn default_filters_send_nothing() {
        assert!(filter_params(&FilterState::default()).is_empty());
        assert!(evolution_params(&FilterState::default(), &[]).is_empty());
    }

    #[test]
    fn sentinels_are_never_sent_literally() {
        let filters = FilterState { year: YearSelection::Specific(2016), ..Default::default() };
        let params = filter_params(&filters);
        assert_eq!(params, vec![("year", "2016".to_string())]);
        for (_, value) in &params {
            assert!(!["Both", "All", "Total"].contains(&value.as_str()));
        }
    }

    #[test]
    fn every_non_sentinel_field_is_sent_with_its_exact_value() {
        let filters = FilterState {
            season: Season::Winter,
            sex: Sex::F,
            sport: "Alpine Skiing".into(),
            country: "NOR".into(),
            medal_type: MedalType::Silver,
            year: YearSelection::Specific(1994),
        };
        assert_eq!(
            filter_params(&filters),
            vec![
                ("year", "1994".to_string()),
                ("season", "Winter".to_string()),
                ("sex", "F".to_string()),
                ("sport", "Alpine Skiing".to_string()),
                ("country", "NOR".to_string()),
                ("medal_type", "Silver".to_string()),
            ]
        );
    }

    #[test]
    fn zero_year_counts_as_unset() {
        let filters = FilterState { year: YearSelection::Specific(0), ..Default::default() };
        assert!(filter_params(&filters).is_empty());
    }

    #[test]
    fn each_sentinel_is_omitted_independently() {
        let base = FilterState {
            season: Season::Summer,
            sex: Sex::M,
            sport: "Judo".into(),
            country: "BRA".into(),
            medal_type: MedalType::Gold,
            year: YearSelection::Specific(2016),
        };

        let cases: Vec<(FilterState, &str)> = vec![
            (FilterState { season: Season::Both, ..base.clone() }, "season"),
            (FilterState { sex: Sex::Both, ..base.clone() }, "sex"),
            (FilterState { sport: "All".into(), ..base.clone() }, "sport"),
            (FilterState { country: "All".into(), ..base.clone() }, "country"),
            (FilterState { medal_type: MedalType::Total, ..base.clone() }, "medal_type"),
            (FilterState { year: YearSelection::AllYears, ..base.clone() }, "year"),
        ];

        for (filters, omitted) in cases {
            let params = filter_params(&filters);
            assert!(!names(&params).contains(&omitted), "{omitted} should be omitted: {params:?}");
            assert_eq!(params.len(), 5, "only {omitted} should be dropped: {params:?}");
        }
    }

    #[test]
    fn evolution_params_drop_year_and_repeat_countries() {
        let filters = FilterState {
            season: Season::Summer,
            year: YearSelection::Specific(2008),
            ..Default::default()
        };
        let params = evolution_params(&filters, &["USA".to_string(), "CHN".to_string()]);
        assert_eq!(
            params,
            vec![
                ("season", "Summer".to_string()),
                ("countries", "USA".to_string()),
                ("countries", "CHN".to_string()),
            ]
        );
    }
}
