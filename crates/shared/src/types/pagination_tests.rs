use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 20);
}

#[test]
fn test_page_request_offset() {
    let request = PageRequest {
        page: 3,
        per_page: 25,
    };
    assert_eq!(request.offset(), 50);
    assert_eq!(request.limit(), 25);
}

#[test]
fn test_page_request_normalized() {
    let request = PageRequest {
        page: 0,
        per_page: 5000,
    }
    .normalized();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, MAX_PER_PAGE);
    assert_eq!(request.offset(), 0);
}

#[test]
fn test_page_response_rounds_pages_up() {
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 25);
    assert_eq!(response.meta.total_pages, 3);

    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 30);
    assert_eq!(response.meta.total_pages, 3);
}

#[test]
fn test_page_response_empty() {
    let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 0);
    assert_eq!(response.meta.total_pages, 1);
    assert!(response.data.is_empty());
}
