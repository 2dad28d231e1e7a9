// ABOUTME: Client-side script served at /static/app.js
// ABOUTME: Category filter, course modal, enroll button, lecture completion and search paging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

/// Browser script included by every page
pub const APP_JS: &str = r##"(function () {
  'use strict';

  function esc(text) {
    return String(text == null ? '' : text)
      .replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
      .replace(/"/g, '&quot;').replace(/'/g, '&#39;');
  }

  function vnd(amount) {
    return Number(amount || 0).toLocaleString('vi-VN') + ' ₫';
  }

  function stars(rating) {
    var html = '<span class="stars">';
    for (var i = 1; i <= 5; i++) {
      var icon = rating >= i ? 'bi-star-fill' : (rating >= i - 0.5 ? 'bi-star-half' : 'bi-star');
      html += '<i class="bi ' + icon + '"></i>';
    }
    return html + '</span>';
  }

  function card(course) {
    var category = course.category_name || 'Uncategorized';
    var price = '<span class="fw-bold text-primary">' + vnd(course.current_price) + '</span>';
    if (course.current_price < course.original_price && course.original_price > 0) {
      var percent = Math.round(100 * (course.original_price - course.current_price) / course.original_price);
      price += ' <del class="text-muted small">' + vnd(course.original_price) + '</del> <span class="badge bg-danger">-' + percent + '%</span>';
    }
    var badges = course.is_bestseller ? '<span class="badge bg-warning text-dark ms-1">Bestseller</span>' : '';
    if (course.is_new) {
      badges += '<span class="badge bg-success ms-1">New</span>';
    }
    return '<div class="col-12 col-sm-6 col-lg-3 d-flex">' +
      '<div class="card shadow-sm border-0 rounded-4 h-100 w-100 hover-shadow course-card" data-id="' + course.course_id + '">' +
      '<img src="' + esc(course.image_url || '/static/placeholder.svg') + '" alt="' + esc(course.title) + '" class="card-img-top" style="height:180px;object-fit:cover">' +
      '<div class="card-body d-flex flex-column justify-content-between"><div>' +
      '<span class="badge bg-light text-primary mb-2">' + esc(category) + '</span>' + badges +
      '<h6 class="fw-semibold mb-1"><a class="text-dark text-decoration-none" href="/courses/' + course.course_id + '">' + esc(course.title) + '</a></h6>' +
      '<div class="small text-secondary mb-2">' + esc(course.instructor_name || '') + '</div></div>' +
      '<div><div class="small mb-1">' + Number(course.star || 0).toFixed(1) + ' ' + stars(course.star || 0) +
      ' <span class="text-muted">(' + course.student_count + ' students)</span></div><div>' + price + '</div></div>' +
      '</div></div></div>';
  }

  function grid(courses, emptyMessage) {
    if (!courses || courses.length === 0) {
      return '<div class="col-12 text-center text-muted py-5"><p>' + esc(emptyMessage) + '</p></div>';
    }
    return courses.map(card).join('');
  }

  function getJson(url) {
    return fetch(url, { headers: { 'Accept': 'application/json' }, credentials: 'same-origin' })
      .then(function (response) {
        return response.json().then(function (body) { return { status: response.status, body: body }; });
      });
  }

  function postJson(url) {
    return fetch(url, { method: 'POST', headers: { 'Accept': 'application/json' }, credentials: 'same-origin' })
      .then(function (response) {
        return response.json().then(function (body) { return { status: response.status, body: body }; });
      });
  }

  function loginRedirect() {
    window.location.href = '/auth/login?return_to=' + encodeURIComponent(window.location.pathname);
  }

  // Popular grid filter
  function filterPopular(category) {
    var target = document.getElementById('popularCoursesGrid');
    if (!target) {
      return;
    }
    var url = category === 'all' ? '/category/api/all' : '/category/api/' + encodeURIComponent(category);
    getJson(url).then(function (result) {
      target.innerHTML = grid(result.body.courses, 'No courses in this category yet.');
    }).catch(function () {
      target.innerHTML = grid([], 'Could not load courses.');
    });
  }

  document.querySelectorAll('.filter-btn').forEach(function (button) {
    button.addEventListener('click', function () {
      document.querySelectorAll('.filter-btn').forEach(function (b) { b.classList.remove('active'); });
      button.classList.add('active');
      filterPopular(button.dataset.category);
    });
  });

  // Course preview modal
  function openModal(courseId) {
    var content = document.getElementById('modalContent');
    var modalEl = document.getElementById('courseModal');
    if (!content || !modalEl || !window.bootstrap) {
      window.location.href = '/courses/' + courseId;
      return;
    }
    getJson('/courses/detail/' + courseId).then(function (result) {
      if (result.status !== 200) {
        window.location.href = '/courses/' + courseId;
        return;
      }
      var d = result.body;
      var lectures = 0;
      d.sections.forEach(function (s) { lectures += s.lectures.length; });
      content.innerHTML =
        '<div class="row g-4"><div class="col-md-5"><img class="img-fluid rounded" src="' + esc(d.course.image_url || '/static/placeholder.svg') + '" alt=""></div>' +
        '<div class="col-md-7"><h5 class="fw-bold">' + esc(d.course.title) + '</h5>' +
        '<p class="text-muted">' + esc(d.course.description) + '</p>' +
        '<div class="mb-2">' + Number(d.average_rating).toFixed(1) + ' ' + stars(d.average_rating) + ' <span class="text-muted">(' + d.review_count + ' reviews)</span></div>' +
        '<div class="small text-muted mb-2">By ' + esc(d.instructor.name) + ' · ' + lectures + ' lectures · ' + d.enrollment_count + ' students</div>' +
        '<div class="fs-5 fw-bold text-primary mb-3">' + vnd(d.course.current_price) + '</div>' +
        '<a class="btn btn-primary" href="/courses/' + d.course.course_id + '">View course</a></div></div>';
      window.bootstrap.Modal.getOrCreateInstance(modalEl).show();
    });
  }

  document.addEventListener('click', function (event) {
    var target = event.target;
    if (target.closest('a, button, form')) {
      return;
    }
    var cardEl = target.closest('.course-card');
    if (cardEl && cardEl.dataset.id) {
      openModal(cardEl.dataset.id);
    }
  });

  // Enroll
  var enrollButton = document.getElementById('enrollButton');
  if (enrollButton) {
    enrollButton.addEventListener('click', function () {
      var message = document.getElementById('enrollMessage');
      enrollButton.disabled = true;
      postJson('/enrollment/' + enrollButton.dataset.courseId + '/enroll').then(function (result) {
        if (result.status === 401) {
          loginRedirect();
          return;
        }
        if (result.body.success) {
          if (message) {
            message.className = 'mt-2 small text-success';
            message.textContent = result.body.message;
          }
          if (result.body.redirect) {
            window.location.href = result.body.redirect;
          }
          return;
        }
        enrollButton.disabled = false;
        if (message) {
          message.className = 'mt-2 small text-danger';
          message.textContent = (result.body.error && result.body.error.message) || result.body.message || 'Enrollment failed';
        }
      }).catch(function () {
        enrollButton.disabled = false;
      });
    });
  }

  // Lecture completion
  function setProgress(progress) {
    var bar = document.getElementById('courseProgress');
    if (!bar) {
      return;
    }
    bar.setAttribute('aria-valuenow', progress);
    var inner = bar.querySelector('.progress-bar');
    if (inner) {
      inner.style.width = progress + '%';
      inner.textContent = progress + '%';
    }
  }

  document.querySelectorAll('.complete-lecture').forEach(function (button) {
    button.addEventListener('click', function () {
      button.disabled = true;
      postJson(button.dataset.url).then(function (result) {
        if (result.status === 401) {
          loginRedirect();
          return;
        }
        if (result.status !== 200) {
          button.disabled = false;
          return;
        }
        setProgress(result.body.progress);
        button.classList.remove('btn-outline-success');
        button.classList.add('btn-success');
        button.textContent = 'Completed';
        var item = document.querySelector('.list-group-item[data-lecture-id="' + button.dataset.lectureId + '"] i');
        if (item) {
          item.className = 'bi bi-check-circle-fill text-success me-2';
        }
      }).catch(function () {
        button.disabled = false;
      });
    });
  });

  // Search paging
  var results = document.getElementById('searchResults');
  var pager = document.getElementById('searchPagination');

  function renderPager(page, totalPages) {
    if (!pager) {
      return;
    }
    if (totalPages <= 1) {
      pager.innerHTML = '';
      return;
    }
    var html = '<nav><ul class="pagination justify-content-center">';
    for (var n = 1; n <= totalPages; n++) {
      html += '<li class="page-item' + (n === page ? ' active' : '') + '"><a class="page-link" href="#" data-page="' + n + '">' + n + '</a></li>';
    }
    pager.innerHTML = html + '</ul></nav>';
  }

  function loadSearch(page) {
    var q = results.dataset.q || '';
    var sort = results.dataset.sort || '';
    var url = '/api/search?q=' + encodeURIComponent(q) + '&sort=' + encodeURIComponent(sort) + '&page=' + page;
    getJson(url).then(function (result) {
      var body = result.body;
      results.innerHTML = grid(body.courses, 'No courses match your search.');
      results.dataset.page = body.page;
      results.dataset.totalPages = body.totalPages;
      renderPager(body.page, body.totalPages);
      if (window.history && window.history.replaceState) {
        window.history.replaceState(null, '', '/search?q=' + encodeURIComponent(q) + '&sort=' + encodeURIComponent(sort) + '&page=' + body.page);
      }
      window.scrollTo({ top: 0, behavior: 'smooth' });
    });
  }

  if (results && pager) {
    pager.addEventListener('click', function (event) {
      var link = event.target.closest('a[data-page]');
      if (!link) {
        var plain = event.target.closest('a.page-link');
        if (!plain) {
          return;
        }
        var match = /[?&]page=(\d+)/.exec(plain.getAttribute('href') || '');
        if (!match) {
          return;
        }
        event.preventDefault();
        loadSearch(Number(match[1]));
        return;
      }
      event.preventDefault();
      loadSearch(Number(link.dataset.page));
    });
  }
})();
"##;

/// Image shown for courses without a cover
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="360" viewBox="0 0 640 360"><rect width="640" height="360" fill="#e9ecef"/><path d="M280 130l100 50-100 50z" fill="#adb5bd"/></svg>"##;

#[cfg(test)]
mod tests {
    use super::APP_JS;

    #[test]
    fn test_script_targets_existing_endpoints() {
        for endpoint in [
            "/category/api/",
            "/courses/detail/",
            "/enrollment/",
            "/api/search",
        ] {
            assert!(APP_JS.contains(endpoint), "missing {endpoint}");
        }
    }

    #[test]
    fn test_script_is_complete() {
        assert!(APP_JS.contains(r##"href="#" data-page=""##));
        assert!(APP_JS.trim_end().ends_with("})();"));
    }
}
