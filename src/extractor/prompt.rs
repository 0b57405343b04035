//! Prompt assembly for schema-constrained product extraction.

use super::vocab::{BRANDS, CATEGORY_TAXONOMY};

/// Build the extraction prompt for one rendered product page: the raw page
/// content, both closed vocabularies as JSON blocks, and a field-by-field
/// schema with inline constraints.
pub fn build_prompt(html_data: &str) -> String {
    format!(
        "```html_data\n{html_data}\n```\n\n\
         ```available_brand_data\n{brands}\n```\n\n\
         ```available_category_data\n{categories}\n```\n\n\
         Process the given html_data into a comma-separated dict format JSON data containing the following elements.\n\n\
         price : int (상품의 판매 가격),\n\
         market_price : str (상품의 정품 가격 또는 매장 가격. 찾을 수 없다면 공백),\n\
         brand : string (상품의 영어 브랜드 이름. 반드시 available_brand_data 에 포함되어야 함. 포함되지 않는다면 공백),\n\
         first_category : string (상품의 1차 카테고리 분류. 반드시 available_category_data의 key 에 포함되어야 함. 포함되지 않는다면 공백),\n\
         second_category : string (상품의 2차 카테고리 분류. 반드시 available_category_data의 list에 포함되어야 함. 포함되지 않거나 first_category가 공백이라면 공백),\n\
         gender : string (상품의 대상 성별. '남성', '여성', '남성,여성' 중 하나. 정확하지 않다면 '남성,여성'),\n\
         colors : list(string) (상품의 색상 옵션값. 찾을 수 없다면 []),\n\
         sizes : list(string) (상품의 사이즈 옵션값. 찾을 수 없다면 []),\n\
         kor_name : string (상품의 한글 이름. 이름 앞에 브랜드가 딱 한번 적혀 있어야 하며 반드시 한글이어야 함),\n\
         eng_name : string (상품의 한글 이름의 영어 번역 결과. 이름 앞에 브랜드가 딱 한번 적혀 있어야 하며 반드시 영어여야 함),\n\
         genuine_number : string (상품의 정품 코드. 정품 번호는 제품 이름에 의미 없는 문자와 숫자의 조합으로 표시될 수 있음. 찾을 수 없다면 공백)",
        brands = brand_block(),
        categories = category_block(),
    )
}

fn brand_block() -> String {
    serde_json::to_string_pretty(BRANDS).unwrap()
}

/// Taxonomy rendered as a JSON object, first-level keys in taxonomy order.
fn category_block() -> String {
    let mut block = String::from("{\n");
    for (i, (first, seconds)) in CATEGORY_TAXONOMY.iter().enumerate() {
        block.push_str("    ");
        block.push_str(&serde_json::to_string(first).unwrap());
        block.push_str(": ");
        block.push_str(&serde_json::to_string(seconds).unwrap());
        if i + 1 < CATEGORY_TAXONOMY.len() {
            block.push(',');
        }
        block.push('\n');
    }
    block.push('}');
    block
}
