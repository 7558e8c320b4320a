//! Common BASIC programs for tests.

pub const GUESSING_GAME: &str = r#"10 REM GUESSING GAME
20 DIM A(10), B$(5, 5)
30 LET N = INT(RND(1) * 100) + 1
40 INPUT "YOUR GUESS"; G
50 IF G = N THEN 100
60 IF G < N THEN PRINT "HIGHER" ELSE PRINT "LOWER"
70 FOR I = 1 TO 10 STEP 2: A(I) = I ^ 2: NEXT I
80 ON G GOSUB 200, 300
90 GOTO 40
100 PRINT "RIGHT!"; N, -N
110 DATA 1, TWO, "3"
120 READ X, Y$: RESTORE 110
130 END
200 RETURN
300 STOP ' done
"#;

pub const SHORT_PROGRAM: &str = "10 LET X = 1\n20 PRINT X; \"!\"\n30 GOTO 10\n";

pub const WITH_ERRORS: &str = "10 PRINT (1 + 2\n20 LET = 5\n30 GOTO\n40 PRINT @\n50 END\n";
