use olympics_api::{ALL, Season, YearSelection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Portuguese,
}

impl Language {
    pub fn next(self) -> Self {
        match self {
            Language::English => Language::Portuguese,
            Language::Portuguese => Language::English,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Portuguese => "PT",
        }
    }
}

/// UI strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Overview,
    Athletes,
    Biometrics,
    Evolution,
    Search,
    Help,
    Filters,
    Season,
    Sex,
    Sport,
    Country,
    Year,
    MedalType,
    Summer,
    Winter,
    Both,
    Male,
    Female,
    All,
    AllYears,
    AllSports,
    AllCountries,
    Gold,
    Silver,
    Bronze,
    Total,
    MedalMap,
    MedalTable,
    TopAthletes,
    GenderSplit,
    NoData,
    Loading,
    Online,
    Playing,
    Paused,
    Speed,
    Slow,
    Normal,
    Fast,
    SearchPrompt,
    NoResults,
    Profile,
    Participations,
    MedalsBySport,
    Height,
    Weight,
    Age,
    Team,
    BackendUnreachable,
    SelectCountry,
    SelectSport,
}

pub fn t(language: Language, text: Text) -> &'static str {
    match language {
        Language::English => english(text),
        Language::Portuguese => portuguese(text),
    }
}

fn english(text: Text) -> &'static str {
    match text {
        Text::Overview => "Overview",
        Text::Athletes => "Athletes",
        Text::Biometrics => "Biometrics",
        Text::Evolution => "Evolution",
        Text::Search => "Search",
        Text::Help => "Help",
        Text::Filters => "Filters",
        Text::Season => "Season",
        Text::Sex => "Sex",
        Text::Sport => "Sport",
        Text::Country => "Country",
        Text::Year => "Year",
        Text::MedalType => "Medal",
        Text::Summer => "Summer",
        Text::Winter => "Winter",
        Text::Both => "Both",
        Text::Male => "Male",
        Text::Female => "Female",
        Text::All => "All",
        Text::AllYears => "All years",
        Text::AllSports => "All sports",
        Text::AllCountries => "All countries",
        Text::Gold => "Gold",
        Text::Silver => "Silver",
        Text::Bronze => "Bronze",
        Text::Total => "Total",
        Text::MedalMap => "Medals by country",
        Text::MedalTable => "Medal table",
        Text::TopAthletes => "Top athletes",
        Text::GenderSplit => "Participation by sex",
        Text::NoData => "No data for these filters",
        Text::Loading => "loading",
        Text::Online => "online",
        Text::Playing => "playing",
        Text::Paused => "paused",
        Text::Speed => "speed",
        Text::Slow => "slow",
        Text::Normal => "normal",
        Text::Fast => "fast",
        Text::SearchPrompt => "Type / to search athletes",
        Text::NoResults => "No athletes found",
        Text::Profile => "Profile",
        Text::Participations => "Participations",
        Text::MedalsBySport => "Medals by sport",
        Text::Height => "Height",
        Text::Weight => "Weight",
        Text::Age => "Age",
        Text::Team => "Team",
        Text::BackendUnreachable => "Could not reach the stats backend",
        Text::SelectCountry => "Select country",
        Text::SelectSport => "Select sport",
    }
}

fn portuguese(text: Text) -> &'static str {
    match text {
        Text::Overview => "Visão geral",
        Text::Athletes => "Atletas",
        Text::Biometrics => "Biometria",
        Text::Evolution => "Evolução",
        Text::Search => "Busca",
        Text::Help => "Ajuda",
        Text::Filters => "Filtros",
        Text::Season => "Temporada",
        Text::Sex => "Gênero",
        Text::Sport => "Modalidade",
        Text::Country => "País",
        Text::Year => "Ano",
        Text::MedalType => "Medalha",
        Text::Summer => "Verão",
        Text::Winter => "Inverno",
        Text::Both => "Ambas",
        Text::Male => "Masculino",
        Text::Female => "Feminino",
        Text::All => "Todos",
        Text::AllYears => "Todos os anos",
        Text::AllSports => "Todas as modalidades",
        Text::AllCountries => "Todos os países",
        Text::Gold => "Ouro",
        Text::Silver => "Prata",
        Text::Bronze => "Bronze",
        Text::Total => "Total",
        Text::MedalMap => "Medalhas por país",
        Text::MedalTable => "Quadro de medalhas",
        Text::TopAthletes => "Maiores medalhistas",
        Text::GenderSplit => "Participação por gênero",
        Text::NoData => "Sem dados para estes filtros",
        Text::Loading => "carregando",
        Text::Online => "online",
        Text::Playing => "reproduzindo",
        Text::Paused => "pausado",
        Text::Speed => "velocidade",
        Text::Slow => "lenta",
        Text::Normal => "normal",
        Text::Fast => "rápida",
        Text::SearchPrompt => "Digite / para buscar atletas",
        Text::NoResults => "Nenhum atleta encontrado",
        Text::Profile => "Perfil",
        Text::Participations => "Participações",
        Text::MedalsBySport => "Medalhas por modalidade",
        Text::Height => "Altura",
        Text::Weight => "Peso",
        Text::Age => "Idade",
        Text::Team => "Equipe",
        Text::BackendUnreachable => "Falha ao conectar com o backend",
        Text::SelectCountry => "Selecione o país",
        Text::SelectSport => "Selecione a modalidade",
    }
}

/// Portuguese sport names; anything missing stays in English.
fn portuguese_sport(sport: &str) -> Option<&'static str> {
    Some(match sport {
        "Athletics" => "Atletismo",
        "Swimming" => "Natação",
        "Gymnastics" => "Ginástica",
        "Football" => "Futebol",
        "Basketball" => "Basquete",
        "Volleyball" => "Vôlei",
        "Beach Volleyball" => "Vôlei de praia",
        "Judo" => "Judô",
        "Boxing" => "Boxe",
        "Cycling" => "Ciclismo",
        "Rowing" => "Remo",
        "Sailing" => "Vela",
        "Fencing" => "Esgrima",
        "Wrestling" => "Luta olímpica",
        "Weightlifting" => "Levantamento de peso",
        "Shooting" => "Tiro esportivo",
        "Tennis" => "Tênis",
        "Handball" => "Handebol",
        "Equestrianism" => "Hipismo",
        "Canoeing" => "Canoagem",
        "Diving" => "Saltos ornamentais",
        "Alpine Skiing" => "Esqui alpino",
        "Cross Country Skiing" => "Esqui cross-country",
        "Ski Jumping" => "Salto de esqui",
        "Speed Skating" => "Patinação de velocidade",
        "Figure Skating" => "Patinação artística",
        "Ice Hockey" => "Hóquei no gelo",
        "Biathlon" => "Biatlo",
        "Bobsleigh" => "Bobsled",
        "Snowboarding" => "Snowboard",
        _ => return None,
    })
}

/// Portuguese country names by NOC code.
fn portuguese_country(noc: &str) -> Option<&'static str> {
    Some(match noc {
        "BRA" => "Brasil",
        "USA" => "Estados Unidos",
        "GBR" => "Grã-Bretanha",
        "GER" => "Alemanha",
        "FRA" => "França",
        "ITA" => "Itália",
        "ESP" => "Espanha",
        "POR" => "Portugal",
        "CHN" => "China",
        "JPN" => "Japão",
        "URS" => "União Soviética",
        "RUS" => "Rússia",
        "NOR" => "Noruega",
        "SWE" => "Suécia",
        "FIN" => "Finlândia",
        "CAN" => "Canadá",
        "AUS" => "Austrália",
        "ARG" => "Argentina",
        "MEX" => "México",
        "NED" => "Países Baixos",
        "SUI" => "Suíça",
        "AUT" => "Áustria",
        "HUN" => "Hungria",
        "KOR" => "Coreia do Sul",
        "CUB" => "Cuba",
        "KEN" => "Quênia",
        "JAM" => "Jamaica",
        _ => return None,
    })
}

/// Display text for a country code. Backend labels already read
/// `"Name (CODE)"` and are used whenever no translation exists.
pub fn country_label(language: Language, code: &str, backend_label: &str) -> String {
    if code == ALL {
        return t(language, Text::AllCountries).to_string();
    }
    if language == Language::Portuguese
        && let Some(name) = portuguese_country(code)
    {
        return format!("{name} ({code})");
    }
    if backend_label.is_empty() {
        code.to_string()
    } else {
        backend_label.to_string()
    }
}

pub fn sport_label(language: Language, sport: &str) -> String {
    if sport == ALL {
        return t(language, Text::AllSports).to_string();
    }
    match language {
        Language::Portuguese => portuguese_sport(sport).unwrap_or(sport).to_string(),
        Language::English => sport.to_string(),
    }
}

pub fn season_label(language: Language, season: Season) -> &'static str {
    match season {
        Season::Summer => t(language, Text::Summer),
        Season::Winter => t(language, Text::Winter),
        Season::Both => t(language, Text::Both),
    }
}

/// `"2016 (Summer)"`, `"1924 (Summer / Winter)"`, `"All years"`, or the bare
/// year when its seasons are unknown.
pub fn year_label(
    language: Language,
    year: YearSelection,
    selected_season: Season,
    seasons: Option<&[Season]>,
) -> String {
    let YearSelection::Specific(year) = year else {
        return t(language, Text::AllYears).to_string();
    };
    let Some(seasons) = seasons.filter(|s| !s.is_empty()) else {
        return year.to_string();
    };
    if selected_season != Season::Both {
        return format!("{year} ({})", season_label(language, selected_season));
    }
    let names = seasons
        .iter()
        .map(|s| season_label(language, *s))
        .collect::<Vec<_>>()
        .join(" / ");
    format!("{year} ({names})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_label_lists_every_season_in_both_mode() {
        let seasons = [Season::Summer, Season::Winter];
        assert_eq!(
            year_label(Language::English, YearSelection::Specific(1924), Season::Both, Some(&seasons)),
            "1924 (Summer / Winter)"
        );
        assert_eq!(
            year_label(Language::English, YearSelection::Specific(1924), Season::Winter, Some(&seasons)),
            "1924 (Winter)"
        );
    }

    #[test]
    fn year_label_falls_back_to_the_bare_year() {
        assert_eq!(
            year_label(Language::English, YearSelection::Specific(2016), Season::Both, None),
            "2016"
        );
        assert_eq!(
            year_label(Language::Portuguese, YearSelection::AllYears, Season::Summer, None),
            "Todos os anos"
        );
    }

    #[test]
    fn country_label_prefers_translation_then_backend_label() {
        assert_eq!(country_label(Language::Portuguese, "BRA", "Brazil (BRA)"), "Brasil (BRA)");
        assert_eq!(country_label(Language::English, "BRA", "Brazil (BRA)"), "Brazil (BRA)");
        assert_eq!(country_label(Language::Portuguese, "XYZ", ""), "XYZ");
        assert_eq!(country_label(Language::English, "All", "All"), "All countries");
    }

    #[test]
    fn sport_label_keeps_untranslated_names() {
        assert_eq!(sport_label(Language::Portuguese, "Judo"), "Judô");
        assert_eq!(sport_label(Language::Portuguese, "Curling"), "Curling");
        assert_eq!(sport_label(Language::English, "All"), "All sports");
    }
}
