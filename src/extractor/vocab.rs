//! Closed vocabularies used both to constrain the extraction prompt and to
//! post-validate extracted values before reporting.

/// Brand allow-list. Extracted brands outside this list are blanked.
pub const BRANDS: &[&str] = &[
    "ASK YOURSELF",
    "ACNE STUDIOS",
    "ALEXANDER MCQUEEN",
    "ALEXANDER WANG",
    "ALYX",
    "AMI",
    "AMIRI",
    "ARCTERYX",
    "AUDEMARS PIGUET",
    "BALENCIAGA",
    "BALMAIN",
    "BAPE",
    "BERLUTI",
    "BLANCPAIN",
    "BOTTEGA VENETA",
    "BREGUET",
    "BALLY",
    "BREITLING",
    "BRUNELLO CUCINELLI",
    "BULGARI",
    "BURBERRY",
    "CANADA GOOSE",
    "CARTIER",
    "CASABLANCA",
    "CELINE",
    "CHANEL",
    "CHAUMET",
    "CHLOE",
    "CHROME HEARTS",
    "COMME DES GARCONS",
    "CP COMPANY",
    "DELVAUX",
    "DRIES VAN NOTEN",
    "DIESEL",
    "DIOR",
    "DOLCE & GABBANA",
    "EMPORIO ARMANI",
    "FEAR OF GOD",
    "FENDI",
    "FERRAGAMO",
    "GALLERY DEPT",
    "GENTLE MONSTER",
    "GIVENCHY",
    "GOLDEN GOOSE",
    "GOYARD",
    "GUCCI",
    "HERMES",
    "HUBLOT",
    "ISABEL MARANT",
    "IAB STUDIO",
    "IWC",
    "JACQUEMUS",
    "JIL SANDER",
    "JUNJI",
    "JIMMY CHOO",
    "JORDAN",
    "JUNYA WATANABE",
    "KENZO",
    "LANVIN BLANC",
    "LANVIN",
    "LEMAIRE",
    "LOEWE",
    "LORO PIANA",
    "LOUBOUTIN",
    "LOUIS VUITTON",
    "MACKAGE",
    "MAISON MARGIELA",
    "MAISON MIHARA YASUHIRO",
    "MANOLO BLAHNIK",
    "MARNI",
    "MARTINE ROSE",
    "MAX MARA",
    "MAISON KITSUNE",
    "MIU MIU",
    "MONCLER",
    "MOOSE KNUCKLES",
    "NEW BALANCE",
    "NIKE",
    "OFF WHITE",
    "OMEGA",
    "PHILIPP PLEIN",
    "PANERAI",
    "PARAJUMPERS",
    "PALM ANGELS",
    "PALACE",
    "PATEK PHILIPPE",
    "PRADA",
    "PIAGET",
    "POLORALPHLAUREN",
    "RAY BAN",
    "RHUDE",
    "RICK OWENS",
    "RIMOWA",
    "ROGER VIVIER",
    "ROLEX",
    "SACAI",
    "SUPREME",
    "SAINT LAURENT",
    "SALOMON",
    "STUSSY",
    "STONE ISLAND",
    "TAG HEUER",
    "THE NORTH FACE",
    "THOM BROWNE",
    "TIFFANY & CO",
    "TOM FORD",
    "TUDOR",
    "UMA WANG",
    "VACHERON CONSTANTIN",
    "VALENTINO",
    "VETEMENTS",
    "VANCLEEF",
    "VERSACE",
    "WOOYOUNGMI",
    "YEEZY",
    "ZEGNA",
    "OTHERS",
];

/// Two-level category taxonomy: first-level label paired with its ordered
/// second-level labels.
pub const CATEGORY_TAXONOMY: &[(&str, &[&str])] = &[
    (
        "상의",
        &[
            "반팔 티셔츠",
            "긴팔 티셔츠",
            "니트/가디건",
            "맨투맨",
            "후드",
            "원피스",
            "셔츠",
            "드레스",
            "슬리브리스",
            "셋업",
            "기타 상의",
        ],
    ),
    ("아우터", &["집업", "자켓", "패딩", "레더", "코트", "기타 아우터"]),
    ("하의", &["팬츠", "쇼츠", "트레이닝 팬츠", "데님", "스커트", "기타 하의"]),
    (
        "가방",
        &[
            "미니백",
            "백팩",
            "숄더백",
            "토트백",
            "크로스백",
            "클러치",
            "캐리어",
            "핸드백",
            "더플백",
            "버킷백",
            "기타 가방",
        ],
    ),
    (
        "신발",
        &[
            "스니커즈",
            "샌들/슬리퍼",
            "플랫",
            "로퍼",
            "더비/레이스업",
            "힐/펌프스",
            "부츠",
            "기타 신발",
        ],
    ),
    (
        "지갑",
        &["반지갑", "카드지갑", "지퍼장지갑", "중/장지갑", "여권지갑", "WOC", "기타 지갑"],
    ),
    ("시계", &["메탈", "가죽", "우레탄"]),
    (
        "패션잡화",
        &["머플러/스카프", "아이웨어", "넥타이", "모자", "헤어액세서리", "기타 잡화"],
    ),
    (
        "액세서리",
        &["반지", "목걸이", "팔찌", "귀걸이", "키링", "브로치", "기타 ACC"],
    ),
    ("벨트", &[]),
];

pub fn is_known_brand(brand: &str) -> bool {
    BRANDS.contains(&brand)
}

pub fn is_known_first_category(category: &str) -> bool {
    CATEGORY_TAXONOMY.iter().any(|(first, _)| *first == category)
}

/// Membership in the flattened second-level list, across all first-level
/// groups. Does not check that the value belongs to the record's own
/// first-level category.
pub fn is_known_second_category(category: &str) -> bool {
    CATEGORY_TAXONOMY
        .iter()
        .flat_map(|(_, seconds)| seconds.iter())
        .any(|second| *second == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_membership() {
        assert!(is_known_brand("GUCCI"));
        assert!(is_known_brand("OTHERS"));
        assert!(!is_known_brand("NOTABRAND"));
        assert!(!is_known_brand("gucci"));
    }

    #[test]
    fn test_first_category_membership() {
        assert_eq!(CATEGORY_TAXONOMY.len(), 10);
        assert!(is_known_first_category("가방"));
        assert!(is_known_first_category("벨트"));
        assert!(!is_known_first_category("백팩"));
    }

    #[test]
    fn test_second_category_membership_is_flattened() {
        assert!(is_known_second_category("백팩"));
        assert!(is_known_second_category("메탈"));
        // "메탈" belongs to 시계, yet passes regardless of the record's
        // first-level category.
        assert!(!is_known_second_category("가방"));
        assert!(!is_known_second_category(""));
    }
}
