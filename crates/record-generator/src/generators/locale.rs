//! Locale-aware pools for realistic personal and address data.

use rand::seq::IndexedRandom;
use rand::Rng;
use std::fmt;

/// Locales with bundled data pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    EnUs,
    FrFr,
    DeDe,
}

impl Locale {
    /// All supported locales.
    pub const ALL: [Locale; 3] = [Locale::EnUs, Locale::FrFr, Locale::DeDe];

    /// Parse a locale tag. Both `fr_FR` and `fr-FR` are accepted, case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "en_us" | "en" => Some(Locale::EnUs),
            "fr_fr" | "fr" => Some(Locale::FrFr),
            "de_de" | "de" => Some(Locale::DeDe),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en_US",
            Locale::FrFr => "fr_FR",
            Locale::DeDe => "de_DE",
        }
    }

    pub(crate) fn pools(&self) -> &'static LocalePools {
        match self {
            Locale::EnUs => &EN_US,
            Locale::FrFr => &FR_FR,
            Locale::DeDe => &DE_DE,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How a street address is laid out.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StreetLayout {
    /// `123 Main Street`
    NumberFirst,
    /// `Hauptstraße 12`
    NumberLast,
}

pub(crate) struct LocalePools {
    first_names: &'static [&'static str],
    last_names: &'static [&'static str],
    streets: &'static [&'static str],
    street_layout: StreetLayout,
    cities: &'static [&'static str],
    states: &'static [&'static str],
    country: &'static str,
    calling_code: &'static str,
    email_domains: &'static [&'static str],
    /// `#` is replaced by a random digit.
    phone_format: &'static str,
}

static EN_US: LocalePools = LocalePools {
    first_names: &[
        "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
        "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    ],
    last_names: &[
        "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
        "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Taylor", "Thomas",
    ],
    streets: &[
        "Main Street", "Oak Avenue", "Maple Drive", "Cedar Lane", "Pine Road", "Elm Street",
        "Washington Boulevard", "Lakeview Court", "Sunset Drive", "Park Place",
    ],
    street_layout: StreetLayout::NumberFirst,
    cities: &[
        "Springfield", "Riverside", "Portland", "Austin", "Denver", "Madison", "Columbus",
        "Georgetown", "Fairview", "Salem",
    ],
    states: &["CA", "NY", "TX", "WA", "IL", "MA", "CO", "OR", "FL", "GA"],
    country: "United States",
    calling_code: "+1",
    email_domains: &["example.com", "example.org", "mail.example.net"],
    phone_format: "(###) ###-####",
};

static FR_FR: LocalePools = LocalePools {
    first_names: &[
        "Camille", "Léa", "Manon", "Chloé", "Inès", "Lucas", "Hugo", "Louis", "Théo", "Gabriel",
        "Jules", "Émilie", "Zoé", "Mathis", "Nathan", "Élodie",
    ],
    last_names: &[
        "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
        "Moreau", "Simon", "Laurent", "Lefèvre", "Michel", "Garnier", "Rousseau",
    ],
    streets: &[
        "rue de la Paix", "avenue Victor Hugo", "boulevard Saint-Michel", "rue du Moulin",
        "place de la République", "rue des Écoles", "chemin des Vignes", "rue Pasteur",
        "allée des Tilleuls", "quai de la Loire",
    ],
    street_layout: StreetLayout::NumberFirst,
    cities: &[
        "Paris", "Lyon", "Marseille", "Toulouse", "Nantes", "Strasbourg", "Bordeaux", "Lille",
        "Rennes", "Montpellier",
    ],
    states: &[
        "Île-de-France", "Bretagne", "Normandie", "Occitanie", "Grand Est",
        "Nouvelle-Aquitaine", "Hauts-de-France", "Auvergne-Rhône-Alpes",
    ],
    country: "France",
    calling_code: "+33",
    email_domains: &["example.fr", "exemple.fr", "courriel.example.com"],
    phone_format: "0# ## ## ## ##",
};

static DE_DE: LocalePools = LocalePools {
    first_names: &[
        "Lukas", "Leon", "Finn", "Jonas", "Paul", "Felix", "Anna", "Lena", "Marie", "Sophie",
        "Jürgen", "Sören", "Emma", "Hannah", "Mia", "Jörg",
    ],
    last_names: &[
        "Müller", "Schmidt", "Schneider", "Fischer", "Weber", "Meyer", "Wagner", "Becker",
        "Schulz", "Hoffmann", "Schäfer", "Koch", "Bauer", "Richter", "Klein", "Wolf",
    ],
    streets: &[
        "Hauptstraße", "Schulstraße", "Gartenstraße", "Bahnhofstraße", "Dorfstraße",
        "Bergstraße", "Lindenallee", "Kirchweg", "Am Markt", "Goethestraße",
    ],
    street_layout: StreetLayout::NumberLast,
    cities: &[
        "Berlin", "Hamburg", "München", "Köln", "Frankfurt am Main", "Stuttgart", "Düsseldorf",
        "Leipzig", "Dresden", "Hannover",
    ],
    states: &[
        "Bayern", "Berlin", "Hamburg", "Hessen", "Niedersachsen", "Nordrhein-Westfalen",
        "Sachsen", "Baden-Württemberg",
    ],
    country: "Deutschland",
    calling_code: "+49",
    email_domains: &["example.de", "beispiel.de", "post.example.com"],
    phone_format: "0### #######",
};

/// Tags shared by every locale.
pub const TAGS: &[&str] = &[
    "employee", "contractor", "customer", "vendor", "partner", "manager", "developer", "designer",
    "marketing", "sales", "support", "finance", "hr", "operations", "executive",
];

/// Department names shared by every locale.
pub const DEPARTMENTS: &[&str] = &[
    "Engineering", "Marketing", "Sales", "Support", "Finance", "HR", "Operations", "Executive",
    "Product", "Design", "Research", "Legal", "IT", "Customer Success",
];

const WORDS: &[&str] = &[
    "alpha", "bravo", "delta", "echo", "harbor", "meadow", "signal", "vector", "summit", "copper",
    "lantern", "orbit", "quartz", "river", "timber", "willow",
];

fn choose<R: Rng>(pool: &'static [&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Replace each `#` with a random digit.
pub fn numerify<R: Rng>(format: &str, rng: &mut R) -> String {
    format
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.random_range(0..10u8)),
            other => other,
        })
        .collect()
}

/// Fold accented Latin letters to ASCII for use in email local parts.
fn ascii_fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'à' | 'â' | 'ä' | 'á' => out.push('a'),
            'é' | 'è' | 'ê' | 'ë' | 'É' => out.push('e'),
            'î' | 'ï' | 'í' => out.push('i'),
            'ô' | 'ö' | 'ó' => out.push('o'),
            'ù' | 'û' | 'ü' | 'ú' => out.push('u'),
            'ç' => out.push('c'),
            'ß' => out.push_str("ss"),
            c if c.is_ascii_alphanumeric() => out.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }
    out
}

impl LocalePools {
    pub fn person_name<R: Rng>(&self, rng: &mut R) -> String {
        format!("{} {}", choose(self.first_names, rng), choose(self.last_names, rng))
    }

    pub fn email<R: Rng>(&self, rng: &mut R) -> String {
        let first = ascii_fold(choose(self.first_names, rng));
        let last = ascii_fold(choose(self.last_names, rng));
        let suffix = rng.random_range(1..100);
        format!("{first}.{last}{suffix}@{}", choose(self.email_domains, rng))
    }

    pub fn phone_number<R: Rng>(&self, rng: &mut R) -> String {
        numerify(self.phone_format, rng)
    }

    pub fn calling_code(&self) -> &'static str {
        self.calling_code
    }

    pub fn street_address<R: Rng>(&self, rng: &mut R) -> String {
        let number = rng.random_range(1..1000);
        let street = choose(self.streets, rng);
        match self.street_layout {
            StreetLayout::NumberFirst => format!("{number} {street}"),
            StreetLayout::NumberLast => format!("{street} {number}"),
        }
    }

    pub fn city<R: Rng>(&self, rng: &mut R) -> String {
        choose(self.cities, rng).to_string()
    }

    pub fn state<R: Rng>(&self, rng: &mut R) -> String {
        choose(self.states, rng).to_string()
    }

    pub fn postal_code<R: Rng>(&self, rng: &mut R) -> String {
        numerify("#####", rng)
    }

    pub fn country(&self) -> &'static str {
        self.country
    }
}

/// A tag from the shared pool.
pub fn tag<R: Rng>(rng: &mut R) -> String {
    choose(TAGS, rng).to_string()
}

/// A department from the shared pool.
pub fn department<R: Rng>(rng: &mut R) -> String {
    choose(DEPARTMENTS, rng).to_string()
}

/// Two or three filler words joined by spaces.
pub fn words<R: Rng>(rng: &mut R) -> String {
    let count = rng.random_range(2..=3);
    (0..count)
        .map(|_| choose(WORDS, rng))
        .collect::<Vec<_>>()
        .join(" ")
}
