/*!

This is the long-form manual for `ballot_state` and `ballotui`.

## The ballot page

Every post of the election shows one poster per candidate. Each poster comes
with three radio inputs: accept (`1`), reject (`-1`) and neutral (`0`).

A post allows at most `maxVote` accept or reject picks at the same time. When
the voter makes one pick too many, the pick that was made first is dropped
and its candidate goes back to neutral. Changing the pick of a candidate
(accept to reject, or the reverse) does not use another slot, but it counts
as the most recent pick.

Single-winner posts carry the `unique` flag on their inputs. Picking a
candidate there clears every other candidate of the post: the inputs of the
post behave as one radio group and only the chosen input stays checked.

When the vote form is submitted, every checked input of the election is
written to a hidden field as a JSON object:

```text
{"11":1,"12":0,"13":-1,"14":0}
```

Candidates whose inputs were never touched do not appear.

## Page description

`ballotui` reads the page from a JSON file:

```text
{
  "electionId": 7,
  "posts": [
    {
      "id": 1,
      "name": "Council",
      "maxVote": 2,
      "unique": false,
      "candidates": [
        {"id": 11, "name": "Anna"},
        {"id": 12, "name": "Bob"},
        {"id": 15, "name": "NOTA", "autoGenerated": true}
      ]
    }
  ]
}
```

`unique` and `autoGenerated` default to `false`.

## Event script

The interactions are replayed from a JSON list of events, in order:

```text
[
  {"event": "radioChanged", "post": 1, "candidate": 11, "value": 1},
  {"event": "radioChanged", "post": 2, "candidate": 21, "value": 1, "unique": true},
  {"event": "resetPost", "post": 1},
  {"event": "resize", "width": 1024, "height": 768},
  {"event": "submit"}
]
```

When `unique` is not given on a `radioChanged` event, the flag of the post
is used. `submit` uses the election of the page unless `election` is given.

## Checking a submission

With `--check`, the payload of the last submit is decoded and checked the way
the portal checks it on receipt: every key must be a candidate of the
ballot, a post may not hold more accept/reject picks than `maxVote`,
auto-generated candidates (NOTA, neutral) can only be accepted and only alone,
and a reject vote is refused on posts that have more candidates than seats.

*/
