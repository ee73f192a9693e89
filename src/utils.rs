use super::*;

pub(crate) fn deserialize_optional_string<'de, D>(
  deserializer: D,
) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;

  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(Value::Bool(b)) => Err(de::Error::invalid_type(
      Unexpected::Bool(b),
      &"string or number",
    )),
    Some(Value::Array(_)) => Err(de::Error::invalid_type(
      Unexpected::Seq,
      &"string or number",
    )),
    Some(Value::Object(_)) => Err(de::Error::invalid_type(
      Unexpected::Map,
      &"string or number",
    )),
  }
}

pub(crate) fn sanitize_comment(text: &str) -> String {
  let mut cleaned = String::with_capacity(text.len());
  let mut inside_tag = false;
  let mut last_was_space = false;

  for ch in text.chars() {
    match ch {
      '<' => {
        inside_tag = true;

        if !last_was_space {
          cleaned.push(' ');
          last_was_space = true;
        }
      }
      '>' => {
        inside_tag = false;
      }
      _ if inside_tag => {}
      _ if ch.is_whitespace() => {
        if !last_was_space {
          cleaned.push(' ');
          last_was_space = true;
        }
      }
      _ => {
        cleaned.push(ch);
        last_was_space = false;
      }
    }
  }

  let decoded = html_escape::decode_html_entities(cleaned.trim());

  decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
  if text.chars().count() <= max_chars {
    return text.to_string();
  }

  let mut result = String::new();

  for (idx, ch) in text.chars().enumerate() {
    if idx >= max_chars {
      result.push_str("...");
      break;
    }

    result.push(ch);
  }

  result.trim_end().to_string()
}

pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
  if text.is_empty() {
    return Vec::new();
  }

  let mut lines = Vec::new();
  let mut current = String::new();
  let mut current_width = 0;

  for word in text.split_whitespace() {
    let word_width = word.chars().count();

    if current.is_empty() {
      current.push_str(word);
      current_width = word_width;
    } else if current_width + 1 + word_width <= width {
      current.push(' ');
      current.push_str(word);
      current_width += 1 + word_width;
    } else {
      lines.push(current);
      current = word.to_string();
      current_width = word_width;
    }
  }

  if !current.is_empty() {
    lines.push(current);
  }

  if lines.is_empty() {
    vec![text.to_string()]
  } else {
    lines
  }
}

pub(crate) fn format_points(score: u64) -> String {
  pluralize(score, "point")
}

pub(crate) fn format_age(now: u64, time: u64) -> String {
  let seconds = now.saturating_sub(time);

  if seconds < 60 {
    return "just now".to_string();
  }

  let minutes = seconds / 60;

  if minutes < 60 {
    return format!("{minutes}m");
  }

  let hours = minutes / 60;

  if hours < 24 {
    return format!("{hours}h");
  }

  let days = hours / 24;

  if days < 30 {
    format!("{days}d")
  } else {
    format!("{}mo", days / 30)
  }
}

pub(crate) fn domain(url: &str) -> Option<String> {
  let parsed = reqwest::Url::parse(url).ok()?;

  let host = parsed.host_str()?;

  Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

const HTML_RENDER_WIDTH: usize = 4096;

pub(crate) fn html_to_text(html: &str) -> String {
  html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH)
    .map(|text| text.trim_end().to_owned())
    .unwrap_or_else(|_| sanitize_comment(html))
}

pub(crate) fn pluralize(count: u64, word: &str) -> String {
  match count {
    1 => format!("1 {word}"),
    _ => format!("{count} {word}s"),
  }
}

pub(crate) fn unix_now() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map_or(0, |elapsed| elapsed.as_secs())
}
