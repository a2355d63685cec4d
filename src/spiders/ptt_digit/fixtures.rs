//! HTML shaped like the board's markup, trimmed to what the selector table reaches.

pub struct Listing<'a> {
    pub href: Option<&'a str>,
    pub push: Option<&'a str>,
}

pub fn hub_page(listings: &[Listing<'_>], next_page: Option<&str>) -> String {
    let items: String = listings
        .iter()
        .map(|listing| {
            let push = listing
                .push
                .map(|count| format!("<span class=\"amp-thrlst-thumb h1 f2\">{}</span>", count))
                .unwrap_or_default();
            let title = match listing.href {
                Some(href) => format!("<a href=\"{}\">post title</a>", href),
                None => "post title".to_string(),
            };
            format!(
                "<div class=\"block-item\">{}<span class=\"block-item-title\">{}</span></div>",
                push, title
            )
        })
        .collect();

    let mut pages: String = (1..=10)
        .map(|n| format!("<li><a href=\"/?page={}\">{}</a></li>", n, n))
        .collect();
    if let Some(href) = next_page {
        pages.push_str(&format!("<li><a href=\"{}\">&raquo;</a></li>", href));
    }

    format!(
        "<!DOCTYPE html><html><head><title>hub</title></head><body>\
         <div class=\"container\">\
         <div class=\"row row-offcanvas row-offcanvas-right\">\
         <div class=\"col-xs-12 col-sm-12\">\
         <div class=\"row\" style=\"padding:5px\">\
         <div class=\"block-list\">{}</div>\
         <div style=\"width:90%; margin: 30px auto 0; text-align:center;\">\
         <ul class=\"pagination\">{}</ul>\
         </div>\
         </div></div></div></div></body></html>",
        items, pages
    )
}

pub struct PushLine<'a> {
    pub tag: &'a str,
    pub author: &'a str,
    pub content: &'a str,
    pub datetime: &'a str,
}

pub struct PostPage<'a> {
    pub author: &'a str,
    pub title: &'a str,
    pub datetime: Option<&'a str>,
    pub body: &'a str,
    pub pushes: &'a [PushLine<'a>],
}

pub fn post_page(page: &PostPage<'_>) -> String {
    let datetime = page
        .datetime
        .map(|value| format!("<span>{}</span>", value))
        .unwrap_or_default();
    let pushes: String = page
        .pushes
        .iter()
        .map(|push| {
            format!(
                "<div class=\"push\"><span class=\"hl\">#</span><span>{}</span>\
                 <span>{}</span><span>{}</span><span>{}</span></div>",
                push.tag, push.author, push.content, push.datetime
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html><html><head><title>post</title></head><body>\
         <div class=\"container\">\
         <div class=\"row row-offcanvas row-offcanvas-right\">\
         <div class=\"col-xs-12 col-sm-8\">\
         <div class=\"row\" style=\"padding:5px;\">\
         <div><div class=\"thread-head\">\
         <h1 class=\"thread-title\">{title}</h1>\
         <div><span>看板</span><span>Digitalhome</span></div>\
         <div><span>作者</span><span class=\"caption\">{author}</span></div>\
         <div><span>時間</span>{datetime}</div>\
         </div></div>\
         <div></div>\
         <div><div id=\"main-content\">{body}{pushes}</div></div>\
         </div></div></div></div></body></html>",
        title = page.title,
        author = page.author,
        datetime = datetime,
        body = page.body,
        pushes = pushes
    )
}
